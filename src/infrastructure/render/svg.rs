//! SVG emission.

use std::fmt::Write as _;

use crate::domain::entities::RenderRequest;

use super::shapes::Scene;

/// Writes `scene` as a standalone SVG document.
///
/// The view box is in module units (quiet zone included) and the document is
/// sized to `req.size` pixels. Body modules and eyes are emitted as two
/// separate paths so each carries its own fill.
pub fn render_svg(scene: &Scene, req: &RenderRequest) -> String {
    let dim = scene.dimension;

    let mut body = String::new();
    for primitive in scene.body_primitives() {
        primitive.write_path(&mut body);
    }

    let mut eyes = String::new();
    for eye in &scene.eyes {
        for part in &eye.parts {
            part.write_path(&mut eyes);
        }
    }

    let mut out = String::with_capacity(body.len() + eyes.len() + 512);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {dim} {dim}\">",
        size = req.size,
    );
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{dim}\" height=\"{dim}\" fill=\"{}\"/>",
        req.background.to_css()
    );
    if !body.is_empty() {
        let _ = writeln!(
            out,
            "<path class=\"qr-body\" fill=\"{}\" d=\"{body}\"/>",
            req.foreground.to_css()
        );
    }
    let _ = writeln!(
        out,
        "<path class=\"qr-eye\" fill=\"{}\" fill-rule=\"evenodd\" d=\"{eyes}\"/>",
        req.effective_eye_color().to_css()
    );
    out.push_str("</svg>\n");
    out
}
