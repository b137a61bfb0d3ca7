use burn_ndarray::NdArray;
use proptest::prelude::*;
use varreg_core::{DisplacementField, Image, Neighborhood, Spacing, Vector};
use varreg_registration::{
    GradientType, RegistrationFunction, SsdAccumulator, SsdForceConfig, SsdForceFunction,
};

type B = NdArray<f32>;

fn accumulator(samples: &[f64]) -> SsdAccumulator {
    let mut acc = SsdAccumulator::new();
    for &sample in samples {
        acc.add_sample(sample);
    }
    acc
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Updates at voxel (1, 1, 1) of a 3^3 pair, for each gradient type.
fn updates(
    fixed: Vec<f32>,
    warped: Vec<f32>,
    spacing: Spacing<3>,
    time_step: f64,
) -> [Vector<3>; 3] {
    let device = Default::default();
    let fixed = Image::<B, 3>::from_values(fixed, [3, 3, 3], spacing, &device).unwrap();
    let warped = Image::<B, 3>::from_values(warped, [3, 3, 3], spacing, &device).unwrap();
    let field = DisplacementField::<B, 3>::zeros([3, 3, 3], spacing, &device);

    let mut function = SsdForceFunction::new(SsdForceConfig::new().with_time_step(time_step));
    function.set_fixed_image(&fixed);
    function.set_warped_image(&warped);
    function.set_displacement_field(&field);
    function.initialize_iteration().unwrap();

    let neighborhood = Neighborhood::with_radius([1, 1, 1], 1);
    let mut result = [Vector::zeros(); 3];
    for (slot, gradient_type) in [GradientType::Fixed, GradientType::WarpedMoving, GradientType::Symmetric]
        .into_iter()
        .enumerate()
    {
        function.set_gradient_type(gradient_type);
        let mut acc = SsdAccumulator::new();
        result[slot] = function
            .compute_update(&neighborhood, &mut acc, &Vector::zeros())
            .unwrap();
    }
    result
}

proptest! {
    #[test]
    fn test_merge_is_commutative(
        a in prop::collection::vec(-100.0f64..100.0, 0..20),
        b in prop::collection::vec(-100.0f64..100.0, 0..20)
    ) {
        let (a, b) = (accumulator(&a), accumulator(&b));
        let ab = a.merged(b);
        let ba = b.merged(a);
        prop_assert_eq!(ab.number_of_voxels(), ba.number_of_voxels());
        prop_assert!(close(ab.sum_of_squared_differences(), ba.sum_of_squared_differences()));
    }

    #[test]
    fn test_merge_is_associative(
        a in prop::collection::vec(-100.0f64..100.0, 0..20),
        b in prop::collection::vec(-100.0f64..100.0, 0..20),
        c in prop::collection::vec(-100.0f64..100.0, 0..20)
    ) {
        let (a, b, c) = (accumulator(&a), accumulator(&b), accumulator(&c));
        let left = a.merged(b).merged(c);
        let right = a.merged(b.merged(c));
        prop_assert_eq!(left.number_of_voxels(), right.number_of_voxels());
        prop_assert!(close(left.sum_of_squared_differences(), right.sum_of_squared_differences()));
    }

    #[test]
    fn test_split_samples_merge_to_whole(
        samples in prop::collection::vec(-10.0f64..10.0, 1..50),
        cut in 0usize..50
    ) {
        let cut = cut.min(samples.len());
        let whole = accumulator(&samples);
        let merged = accumulator(&samples[..cut]).merged(accumulator(&samples[cut..]));
        prop_assert_eq!(merged.number_of_voxels(), whole.number_of_voxels());
        prop_assert!(close(merged.sum_of_squared_differences(), whole.sum_of_squared_differences()));
    }

    #[test]
    fn test_symmetric_update_is_mean(
        fixed in prop::collection::vec(-10.0f32..10.0, 27),
        warped in prop::collection::vec(-10.0f32..10.0, 27),
        sx in 0.2f64..3.0, sy in 0.2f64..3.0, sz in 0.2f64..3.0,
        time_step in 0.01f64..2.0
    ) {
        let [from_fixed, from_warped, symmetric] =
            updates(fixed, warped, Spacing::new([sx, sy, sz]), time_step);
        let mean = (from_fixed + from_warped) * 0.5;
        for axis in 0..3 {
            prop_assert!(close(symmetric[axis], mean[axis]));
        }
    }

    #[test]
    fn test_update_is_scaled_fixed_gradient(
        fixed in prop::collection::vec(-10.0f32..10.0, 27),
        sx in 0.2f64..3.0, sy in 0.2f64..3.0, sz in 0.2f64..3.0,
        time_step in 0.01f64..2.0
    ) {
        let f: Vec<f64> = fixed.iter().map(|&v| v as f64).collect();
        let [from_fixed, from_warped, _] =
            updates(fixed, vec![0.0; 27], Spacing::new([sx, sy, sz]), time_step);

        // Constant warped image has no gradient.
        prop_assert!(from_warped.is_zero());

        let difference = f[13];
        if difference.abs() < 0.001 {
            prop_assert!(from_fixed.is_zero());
        } else {
            let gradient = Vector::new([
                (f[14] - f[12]) / (2.0 * sx),
                (f[16] - f[10]) / (2.0 * sy),
                (f[22] - f[4]) / (2.0 * sz),
            ]);
            let normalizer = (sx * sx + sy * sy + sz * sz) / 3.0;
            let expected = gradient * (time_step * normalizer * difference);
            for axis in 0..3 {
                prop_assert!(close(from_fixed[axis], expected[axis]));
            }
        }
    }
}
