//! Attitude conversion: rotation matrices to export quaternions.

use nalgebra::{Rotation3, UnitQuaternion};

/// Convert a rotation matrix to an (x, y, z, w) quaternion.
///
/// The scalar part is kept non-negative so the same physical attitude always
/// serializes to the same four numbers.
pub fn quat_from_rotation(rot: &Rotation3<f64>) -> [f64; 4] {
    let q = UnitQuaternion::from_rotation_matrix(rot);
    let mut out = [q.i, q.j, q.k, q.w];
    if out[3] < 0.0 {
        for c in &mut out {
            *c = -*c;
        }
    }
    out
}

/// Attitude of a body seen through a frame conversion: the body's rotation
/// composed with the transpose of the conversion rotation.
pub fn composed_attitude(body: &Rotation3<f64>, conversion: &Rotation3<f64>) -> Rotation3<f64> {
    body * conversion.transpose()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn identity_rotation_gives_identity_quaternion() {
        let q = quat_from_rotation(&Rotation3::identity());
        assert_eq!(q, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn scalar_part_is_never_negative() {
        // A rotation of just under 2π has a quaternion with w < 0 in the raw
        // double-cover representation.
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), 6.2);
        let q = quat_from_rotation(&rot);
        assert!(q[3] >= 0.0);
        let norm: f64 = q.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn composition_undoes_conversion() {
        // If the body attitude equals the conversion rotation, composing with
        // its transpose must give identity.
        let rot = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.7);
        let composed = composed_attitude(&rot, &rot);
        let q = quat_from_rotation(&composed);
        assert!((q[3] - 1.0).abs() < 1e-12);
    }
}
