use coverpress::{
    EditParams, Resolution, SourceImage, export_cover, export_filename, export_image,
};

fn solid_source(width: u32, height: u32, rgba: [u8; 4]) -> SourceImage {
    let data = rgba.repeat(width as usize * height as usize);
    SourceImage::from_rgba8(width, height, data).unwrap()
}

fn decode(bytes: &[u8]) -> image::RgbImage {
    image::load_from_memory(bytes).unwrap().into_rgb8()
}

fn luminance(px: &image::Rgb<u8>) -> f64 {
    (f64::from(px[0]) + f64::from(px[1]) + f64::from(px[2])) / 3.0
}

#[test]
fn standard_export_produces_a_1080_square_jpeg() {
    let source = solid_source(800, 600, [128, 128, 128, 255]);
    let bytes = export_image(&source, &EditParams::default(), Resolution::Standard).unwrap();

    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let img = decode(&bytes);
    assert_eq!((img.width(), img.height()), (1080, 1080));
}

#[test]
fn brightness_boost_survives_the_export_round_trip() {
    // 800x600 mid-gray at +20 brightness vs neutral: the decoded center
    // pixel should be brighter by about 20% of 255, within codec tolerance.
    let source = solid_source(800, 600, [128, 128, 128, 255]);

    let neutral = export_image(&source, &EditParams::default(), Resolution::Standard).unwrap();
    let boosted = export_image(
        &source,
        &EditParams {
            brightness: 20.0,
            ..EditParams::default()
        },
        Resolution::Standard,
    )
    .unwrap();

    let neutral_center = luminance(decode(&neutral).get_pixel(540, 540));
    let boosted_center = luminance(decode(&boosted).get_pixel(540, 540));

    let gain = boosted_center - neutral_center;
    assert!(
        (gain - 51.0).abs() < 6.0,
        "expected ~+51 luminance, got {gain} ({neutral_center} -> {boosted_center})"
    );
}

#[test]
fn cover_export_keeps_unassigned_regions_white() {
    let source = solid_source(640, 480, [180, 40, 40, 255]);
    let params = EditParams::default();
    let bytes = export_cover(
        Some((&source, &params)),
        None,
        None,
        Resolution::Standard,
    )
    .unwrap();

    let img = decode(&bytes);
    assert_eq!((img.width(), img.height()), (1080, 1080));

    // Inside the top band.
    let top = img.get_pixel(540, 300);
    assert!(top[0] > 150 && top[1] < 90, "top band not drawn: {top:?}");
    // Well inside the unassigned bottom half: white modulo JPEG noise.
    let bottom = img.get_pixel(270, 900);
    assert!(
        bottom.0.iter().all(|&c| c > 248),
        "bottom region not white: {bottom:?}"
    );
}

#[test]
fn filename_derivation_matches_the_convention() {
    assert_eq!(
        export_filename("vacation photo.png", Resolution::Standard, "facebook"),
        "facebook_vacation photo_1080x1080.jpg"
    );
    assert_eq!(
        export_filename("cover.png", Resolution::High, "capa"),
        "capa_cover_3000x3000.jpg"
    );
}
