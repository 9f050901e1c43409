mod common;

use image::RgbImage;
use qr_render::domain::cache_key::CacheNamespace;
use qr_render::domain::style_resolver::RawRenderOptions;
use serde_json::{Value, json};

const URL: &str = "https://x.test/a";

fn options(value: Value) -> RawRenderOptions {
    RawRenderOptions::from_json(value.as_object().unwrap())
}

fn decode(png: &[u8]) -> RgbImage {
    image::load_from_memory(png).unwrap().to_rgb8()
}

/// Module count per side (quiet zone included), read from the SVG view box.
fn svg_dimension(svg: &str) -> u32 {
    let start = svg.find("viewBox=\"0 0 ").unwrap() + "viewBox=\"0 0 ".len();
    let rest = &svg[start..];
    rest[..rest.find(' ').unwrap()].parse().unwrap()
}

#[tokio::test]
async fn test_png_decodes_to_requested_size() {
    let (service, _dirs) = common::create_file_service().await;

    let png = service
        .generate(
            URL,
            &options(json!({ "size": 256, "color": "000000", "bg": "FFFFFF", "format": "png" })),
        )
        .await
        .unwrap();

    let image = decode(&png);
    assert_eq!((image.width(), image.height()), (256, 256));
}

#[tokio::test]
async fn test_repeated_generate_is_served_from_cache() {
    let (service, dirs) = common::create_file_service().await;
    let opts = options(json!({ "size": 256, "format": "png" }));

    let first = service.generate(URL, &opts).await.unwrap();
    assert_eq!(common::cached_files(&dirs, "qr"), 1);

    let second = service.generate(URL, &opts).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(common::cached_files(&dirs, "qr"), 1);
}

#[tokio::test]
async fn test_svg_ignores_logo() {
    let (service, _dirs) = common::create_file_service().await;

    let with_logo = service
        .generate(URL, &options(json!({ "format": "svg", "logo": common::LOGO_REF })))
        .await
        .unwrap();
    let without_logo = service
        .generate(URL, &options(json!({ "format": "svg" })))
        .await
        .unwrap();

    let svg = String::from_utf8(with_logo.clone()).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(!svg.contains("<image"));
    assert_eq!(with_logo, without_logo);
}

#[tokio::test]
async fn test_png_logo_changes_center_only() {
    let (service, _dirs) = common::create_file_service().await;

    let plain = decode(
        &service
            .generate(URL, &options(json!({ "size": 300 })))
            .await
            .unwrap(),
    );
    let branded = decode(
        &service
            .generate(URL, &options(json!({ "size": 300, "logo": common::LOGO_REF })))
            .await
            .unwrap(),
    );

    assert_eq!(branded.dimensions(), plain.dimensions());

    let center = branded.get_pixel(150, 150);
    assert!(center[0] > 200 && center[1] < 60 && center[2] < 60);
    assert_ne!(branded.get_pixel(150, 150), plain.get_pixel(150, 150));
    assert_eq!(branded.get_pixel(2, 2), plain.get_pixel(2, 2));
}

#[tokio::test]
async fn test_unknown_logo_renders_plain_png() {
    let (service, _dirs) = common::create_file_service().await;

    let plain = service.generate(URL, &options(json!({}))).await.unwrap();
    let missing = service
        .generate(URL, &options(json!({ "logo": "no-such-asset" })))
        .await
        .unwrap();

    assert_eq!(decode(&plain), decode(&missing));
}

#[tokio::test]
async fn test_eye_color_is_independent_of_body() {
    let (service, _dirs) = common::create_file_service().await;
    let style = json!({ "moduleStyle": "dots", "eyeStyle": "leaf", "eyeColor": "#FF0000" });

    let mut svg_style = style.clone();
    svg_style["format"] = json!("svg");
    let svg = String::from_utf8(service.generate(URL, &options(svg_style)).await.unwrap()).unwrap();
    assert!(svg.contains("class=\"qr-body\" fill=\"#000000\""));
    assert!(svg.contains("class=\"qr-eye\" fill=\"#ff0000\""));

    let dimension = svg_dimension(&svg);
    let size = 1000;
    let margin = 1;

    let mut png_style = style.clone();
    png_style["size"] = json!(size);
    let png = decode(&service.generate(URL, &options(png_style)).await.unwrap());

    let scale = f64::from(size) / f64::from(dimension);
    let px = |module: f64| (module * scale) as u32;

    // Center of the top-left finder's inner block.
    let eye = png.get_pixel(px(margin as f64 + 3.5), px(margin as f64 + 3.5));
    assert!(eye[0] > 200 && eye[1] < 60 && eye[2] < 60, "eye pixel {eye:?}");

    let finder_end = margin + 7;
    let far = dimension - margin - 7;
    let in_finder = |mx: u32, my: u32| {
        (mx < finder_end && my < finder_end)
            || (mx >= far && my < finder_end)
            || (mx < finder_end && my >= far)
    };

    let mut body_dark = 0;
    for my in margin..dimension - margin {
        for mx in margin..dimension - margin {
            if in_finder(mx, my) {
                continue;
            }
            let pixel = png.get_pixel(px(mx as f64 + 0.5), px(my as f64 + 0.5));
            assert!(
                !(pixel[0] > 200 && pixel[1] < 60),
                "body module ({mx}, {my}) drawn in eye color"
            );
            if pixel[0] < 60 && pixel[1] < 60 && pixel[2] < 60 {
                body_dark += 1;
            }
        }
    }
    assert!(body_dark > 0);
}

#[tokio::test]
async fn test_oversized_request_is_clamped() {
    let (service, _dirs) = common::create_file_service().await;

    let png = service
        .generate(URL, &options(json!({ "size": 9999 })))
        .await
        .unwrap();

    let image = decode(&png);
    assert_eq!((image.width(), image.height()), (2000, 2000));
}

#[tokio::test]
async fn test_clear_cache_evicts_every_generated_entry() {
    let (service, dirs) = common::create_file_service().await;

    let variants = [
        json!({ "format": "svg" }),
        json!({ "format": "svg", "moduleStyle": "dots" }),
        json!({ "format": "svg", "eyeStyle": "rounded" }),
        json!({ "format": "png", "size": 120 }),
    ];

    for variant in &variants {
        service.generate(URL, &options(variant.clone())).await.unwrap();
    }
    assert_eq!(common::cached_files(&dirs, "qr"), variants.len());

    let removed = service.clear_cache(CacheNamespace::Qr).await.unwrap();
    assert_eq!(removed, variants.len() as u64);
    assert_eq!(common::cached_files(&dirs, "qr"), 0);

    service.generate(URL, &options(variants[0].clone())).await.unwrap();
    assert_eq!(common::cached_files(&dirs, "qr"), 1);
}

#[tokio::test]
async fn test_data_url_matches_generated_bytes() {
    use base64::Engine as _;

    let (service, _dirs) = common::create_file_service().await;
    let opts = options(json!({ "size": 128 }));

    let bytes = service.generate(URL, &opts).await.unwrap();
    let data_url = service.generate_data_url(URL, &opts).await.unwrap();

    let encoded = data_url.strip_prefix("data:image/png;base64,").unwrap();
    assert_eq!(
        base64::engine::general_purpose::STANDARD.decode(encoded).unwrap(),
        bytes
    );
}
