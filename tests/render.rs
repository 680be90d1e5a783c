use image::Rgb;

use mandelfield::painter::{Colormap, Painter, RenderConfig};
use mandelfield::sample;

#[test]
fn test_render_and_save() {
    let s = sample(-2.0, 1.0, -1.5, 1.5, 40, 30, 60).unwrap();
    let config = RenderConfig {
        colormap: Colormap::Inferno,
        gamma: 0.3,
    };
    let img = config.painter().paint(&s.field);
    assert_eq!(img.dimensions(), (40, 30));

    // interior cells are black, escaped cells are not
    for ((i, j), &v) in s.field.indexed_iter() {
        let pixel = *img.get_pixel(i as u32, (29 - j) as u32);
        if v == 0.0 {
            assert_eq!(pixel, Rgb([0, 0, 0]));
        } else {
            assert_ne!(pixel, Rgb([0, 0, 0]));
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mandelbrot.png");
    img.save(&path).unwrap();
    let loaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(loaded, img);
}
