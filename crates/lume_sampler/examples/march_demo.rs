//! Ray marching example.
//!
//! Generates a small camera's rays, marches them against a procedural
//! density blob with importance resampling, and prints sample statistics.

use anyhow::Result;
use lume_sampler::{
    generate_rays, march_batch, Aabb, DensityGuide, Intrinsics, Interval, MarchConfig, Pose,
    ProceduralField, Vec2, Vec3,
};

fn main() -> Result<()> {
    env_logger::init();

    println!("lume ray marcher - demo");
    println!("=======================");

    // A 64x64 camera at the origin looking down +Z
    let intrinsics = Intrinsics::new(64, 64, Vec2::splat(64.0));
    let rays = generate_rays(&intrinsics, &Pose::IDENTITY, Interval::new(1.0, 4.0));
    println!("Generated {} rays", rays.len());

    // Gaussian density blob at world (0, 0, 2.4), in front of the camera
    let blob = ProceduralField(|p: Vec3| {
        let d2 = (p - Vec3::new(0.5, 0.5, 0.9)).length_squared();
        20.0 * (-d2 / 0.02).exp()
    });
    let guide = DensityGuide::new(&blob, Aabb::from_points(Vec3::splat(-3.0), Vec3::splat(3.0)));

    let config = MarchConfig {
        coarse_samples: 64,
        importance_samples: 64,
        perturb: 1.0,
        ..MarchConfig::default()
    };

    let start = std::time::Instant::now();
    let batch = march_batch(&rays, &config, Some(&guide), 42)?;
    println!(
        "Marched {} rays x {} samples in {:?}",
        batch.len(),
        batch[0].z_vals.len(),
        start.elapsed()
    );

    // Where did the samples concentrate on the central ray?
    let center = &batch[64 * 32 + 32];
    let median_z = center.z_vals[center.z_vals.len() / 2];
    println!("Central ray: median sample depth {median_z:.3}");

    let total_points: usize = batch.iter().map(|s| s.points.len()).sum();
    println!("Total sample points: {total_points}");

    Ok(())
}
