use goban_patches::detect;
use goban_patches::grid::{load_circles_json, GridFitParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    goban_patches::core::init_tracing(log::LevelFilter::Info, false);

    let mut args = std::env::args().skip(1);
    let (Some(image_path), Some(circles_path)) = (args.next(), args.next()) else {
        eprintln!("Usage: fit_board <image_path> <circles_json>");
        return Ok(());
    };

    let board = detect::load_board_image(&image_path, Some(2))?;
    let circles = board.shift_circles(&load_circles_json(&circles_path)?);
    let result = detect::fit_board_image(&board.image, &circles, GridFitParams::default())?;

    let diag = &result.diagnostics;
    println!(
        "radius {:.2}px, spacing {:.2}px, {} trusted circles, {} patches",
        diag.estimated_radius,
        diag.lattice.spacing(),
        diag.num_trusted,
        result.patches.len()
    );
    if let Some(patch) = result.patch(9, 9) {
        println!("tengen patch at {:?}", patch.bounds);
    }
    Ok(())
}
