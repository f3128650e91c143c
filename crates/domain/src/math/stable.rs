//! Stable swap invariant (`x³·y + y³·x = k`).

/// Output amount for swapping `amount_in` of the input-side asset against
/// normalized reserves.
///
/// Adding the input to its reserve turns the invariant into a depressed
/// cubic in the opposite reserve; the quote is how far that reserve falls.
pub fn quote(reserve_in: f64, reserve_out: f64, amount_in: f64) -> f64 {
    let k = reserve_in.powi(3) * reserve_out + reserve_out.powi(3) * reserve_in;
    let new_reserve_in = reserve_in + amount_in;
    let new_reserve_out = balancing_reserve(new_reserve_in, new_reserve_in.powi(3), -k);
    reserve_out - new_reserve_out
}

/// Real root of the depressed cubic `a·t³ + c·t + d = 0` via the Cardano
/// closed form.
///
/// Valid only in the single-real-root regime produced by non-negative
/// reserves and a positive trade amount; not a general cubic solver.
fn balancing_reserve(a: f64, c: f64, d: f64) -> f64 {
    let c = c / a;
    let d = d / a;
    let h = (d * d / 4.0 + c * c * c / 27.0).sqrt();
    let r = -d / 2.0 + h;
    let t = -d / 2.0 - h;
    r.cbrt() + t.cbrt()
}
