use num_traits::Float;

/// Returns the angle (in degrees) above the horizontal plane at
/// `start_elev_m` to a point `distance_m` away at `end_elev_m`.
///
/// Negative when the end point is below the start.
pub fn horizon_angle<T>(start_elev_m: T, distance_m: T, end_elev_m: T) -> T
where
    T: Float,
{
    ((end_elev_m - start_elev_m) / distance_m).atan().to_degrees()
}
