use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};

use granula_image::RasterBuffer;
use granula_imgproc::border::{BorderPolicy, BorderedRaster};
use granula_imgproc::{
    distance_transform, filter, flood_fill, maxima, morphology, particles, threshold,
};

#[derive(FromArgs)]
/// Segment a synthetic noisy scene of discs and report its particles
struct Args {
    /// image width
    #[argh(option, default = "320")]
    width: usize,

    /// image height
    #[argh(option, default = "240")]
    height: usize,

    /// number of discs to draw
    #[argh(option, default = "12")]
    discs: usize,

    /// radius of the smoothing and opening kernels
    #[argh(option, short = 'r', default = "1")]
    radius: usize,

    /// random seed
    #[argh(option, default = "0")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let discs = (0..args.discs)
        .map(|_| {
            let r = rng.random_range(4..16i64) as isize;
            let cx = rng.random_range(0..args.width as i64) as isize;
            let cy = rng.random_range(0..args.height as i64) as isize;
            (cx, cy, r)
        })
        .collect::<Vec<_>>();

    // hollow discs on a noisy background
    let noise = (0..args.width * args.height)
        .map(|_| rng.random_range(0..60u8))
        .collect::<Vec<_>>();
    let scene = RasterBuffer::from_fn([args.width, args.height].into(), |x, y| {
        let on_disc = discs.iter().any(|&(cx, cy, r)| {
            let (dx, dy) = (x as isize - cx, y as isize - cy);
            let d2 = dx * dx + dy * dy;
            d2 <= r * r && d2 >= (r / 2) * (r / 2)
        });
        if on_disc {
            200
        } else {
            noise[y * args.width + x]
        }
    })?;

    // smooth, then threshold
    let smooth = filter::gaussian_blur(
        &BorderedRaster::new(&scene, args.radius, args.radius, BorderPolicy::Mirror)?,
        (args.radius, args.radius),
        (1.0, 1.0),
    )?;
    let mask = threshold::threshold_binary(&smooth, 121, u8::MAX, 255u8)?;

    // remove specks and fill the disc centres
    let element = morphology::StructuringElement::Ellipse {
        x_radius: args.radius,
        y_radius: args.radius,
    }
    .to_kernel();
    let opened = morphology::open(
        &BorderedRaster::new(&mask, args.radius, args.radius, BorderPolicy::Constant(0.0))?,
        &element,
    )?;
    let solid = flood_fill::fill_holes(&opened, 255u8)?;

    let blobs = particles::particle_info(&solid, particles::Polarity::WhiteOnBlack)?;
    log::info!(
        "{} discs drawn, {} particles found in {}",
        args.discs,
        blobs.len(),
        solid.size()
    );

    // disc centres are the ridges of the distance map
    let distance = distance_transform::distance_transform(&solid)?;
    let centres = maxima::local_maxima(
        &BorderedRaster::new(&distance, 1, 1, BorderPolicy::Constant(0.0))?,
        3.0,
    )?;
    for peak in maxima::brightest(centres, 5) {
        log::info!("centre ({}, {}) radius {:.1}", peak.x, peak.y, peak.value);
    }
    for (i, blob) in blobs.iter().enumerate() {
        println!(
            "#{i}: area {:>5} center ({:>3}, {:>3}) rect {}x{} at ({}, {})",
            blob.area,
            blob.center_x,
            blob.center_y,
            blob.rect.width(),
            blob.rect.height(),
            blob.rect.left,
            blob.rect.top
        );
    }

    Ok(())
}
