//! Render the first few markers of a built-in dictionary to PNG files.
//!
//! Usage: `cargo run --example draw_marker [DICT_NAME] [COUNT]`

use aruco_dict::{get_predefined_dictionary, PredefinedDictionary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let name: PredefinedDictionary = args
        .next()
        .as_deref()
        .unwrap_or("DICT_5X5_50")
        .parse()?;
    let count: u32 = args.next().as_deref().unwrap_or("4").parse()?;

    let dict = get_predefined_dictionary(name);
    for id in 0..count.min(dict.len() as u32) {
        let raster = dict.draw_marker(id, 280, 1)?;
        let img = image::GrayImage::from_raw(
            raster.width as u32,
            raster.height as u32,
            raster.data,
        )
        .ok_or("raster buffer size mismatch")?;

        let path = format!("{name}_id{id}.png");
        img.save(&path)?;
        println!("wrote {path}");
    }
    Ok(())
}
