use tetwalk_math::Vec3;

/// `n` unit vectors spread evenly over the sphere.
pub(crate) fn fibonacci_directions(n: usize) -> Vec<Vec3> {
    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let r = (1.0 - y * y).sqrt();
            let phi = golden * i as f64;
            Vec3::new(phi.cos() * r, y, phi.sin() * r)
        })
        .collect()
}
