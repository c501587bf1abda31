//! Reference exporter: layout to SVG markup, rasterized with resvg.
//!
//! The markup is built directly from the [`RenderableLayout`], then parsed
//! by usvg and painted onto a tiny-skia pixmap. The raster is encoded as PNG
//! through the `image` crate.

use std::fmt::Write as _;
use std::io::Cursor;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, Options, Tree};
use tracing::debug;

use super::qr::QrMatrix;
use super::{ExportAdapter, ExportedImage, ImageFormat};
use crate::color::HexColor;
use crate::error::PosterError;
use crate::layout::{Avatar, RenderableLayout};
use crate::style::{Background, HeaderFill};

const FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";
const MIN_CARD_WIDTH: u32 = 360;
const CARD_PADDING: u32 = 48;
const HEADER_HEIGHT: u32 = 120;
const AVATAR_RADIUS: u32 = 28;
const FOOTER_LINE: u32 = 20;
const CANVAS_MARGIN: u32 = 16;
const FRAME_MARGIN: u32 = 32;

// ============================================================================
// Geometry
// ============================================================================

/// Pixel positions of every block, in layout units (before scaling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    margin: u32,
    card_width: u32,
    card_height: u32,
    cta_y: u32,
    qr_x: u32,
    qr_y: u32,
    qr_size: u32,
    url_y: u32,
    footer_y: u32,
    powered_by_y: u32,
}

impl Geometry {
    fn measure(layout: &RenderableLayout) -> Self {
        let qr_size = layout.body.qr.size.pixels();
        let card_width = (qr_size + CARD_PADDING * 2).max(MIN_CARD_WIDTH);
        let margin = match layout.style.background {
            Background::Canvas => CANVAS_MARGIN,
            Background::Framed { .. } => FRAME_MARGIN,
        };

        let mut y = HEADER_HEIGHT + 24;
        let cta_y = y + 18;
        if layout.body.call_to_action.visible {
            y += 36;
        }

        let qr_y = y;
        y += qr_size + 16;

        let url_y = y + 14;
        if layout.body.display_url.visible {
            y += 28;
        }

        let footer_y = y + 16;
        if layout.footer.visible {
            y += 12 + FOOTER_LINE * layout.footer.entries.len() as u32;
        }

        let powered_by_y = y + 16;
        if layout.footer.powered_by.visible {
            y += 32;
        }

        Self {
            margin,
            card_width,
            card_height: y + 16,
            cta_y,
            qr_x: (card_width - qr_size) / 2,
            qr_y,
            qr_size,
            url_y,
            footer_y,
            powered_by_y,
        }
    }

    fn width(&self) -> u32 {
        self.card_width + self.margin * 2
    }

    fn height(&self) -> u32 {
        self.card_height + self.margin * 2
    }
}

// ============================================================================
// SvgExporter
// ============================================================================

/// Exports posters as PNG images.
///
/// # Example
///
/// ```no_run
/// use emprendego_poster::{compose, ExportAdapter, PosterConfig, StoreProfile, SvgExporter};
///
/// let store = StoreProfile::new("Café Luna", "cafe-luna");
/// let layout = compose(&store, "https://emprendego.shop/cafe-luna", &PosterConfig::default());
///
/// let png = SvgExporter::new(2.0).export(&layout).unwrap();
/// std::fs::write("poster.png", &png.bytes).unwrap();
/// ```
#[derive(Clone)]
pub struct SvgExporter {
    scale: f32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgExporter {
    /// Creates an exporter that renders at `scale` device pixels per layout pixel.
    ///
    /// System fonts are loaded once here and shared by every export.
    pub fn new(scale: f32) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self::with_fontdb(scale, Arc::new(fontdb))
    }

    /// Creates an exporter with a caller-provided font database.
    pub fn with_fontdb(scale: f32, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            scale: scale.clamp(0.25, 8.0),
            fontdb,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Output size in device pixels for `layout`.
    pub fn canvas_size(&self, layout: &RenderableLayout) -> (u32, u32) {
        let geometry = Geometry::measure(layout);
        (
            (geometry.width() as f32 * self.scale).ceil() as u32,
            (geometry.height() as f32 * self.scale).ceil() as u32,
        )
    }

    /// Builds the SVG markup for `layout` at layout scale.
    pub fn render_markup(&self, layout: &RenderableLayout) -> Result<String, PosterError> {
        let qr = QrMatrix::encode(&layout.body.qr.payload)?;
        Ok(build_markup(layout, &Geometry::measure(layout), &qr))
    }

    /// Renders `layout` into an RGBA image.
    pub fn render_image(&self, layout: &RenderableLayout) -> Result<RgbaImage, PosterError> {
        let markup = self.render_markup(layout)?;

        let mut opts = Options::default();
        opts.fontdb = Arc::clone(&self.fontdb);
        opts.image_href_resolver = usvg::ImageHrefResolver {
            resolve_data: usvg::ImageHrefResolver::default_data_resolver(),
            resolve_string: Box::new(skip_linked_image),
        };
        let tree = Tree::from_str(&markup, &opts).map_err(|e| PosterError::SvgParse(e.to_string()))?;

        let (width, height) = self.canvas_size(layout);
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| PosterError::Raster(format!("cannot allocate {width}x{height} pixmap")))?;
        resvg::render(&tree, Transform::from_scale(self.scale, self.scale), &mut pixmap.as_mut());

        Ok(pixmap_to_rgba_image(&pixmap))
    }
}

// Linked logos are never fetched or read from disk; the badge stays blank.
fn skip_linked_image(_href: &str, _opts: &Options<'_>) -> Option<usvg::ImageKind> {
    None
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ExportAdapter for SvgExporter {
    fn export(&self, layout: &RenderableLayout) -> Result<ExportedImage, PosterError> {
        let raster = self.render_image(layout)?;
        let (width, height) = raster.dimensions();

        let mut bytes = Vec::new();
        raster
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| PosterError::Encode(e.to_string()))?;

        debug!(width, height, size = bytes.len(), "exported poster png");
        Ok(ExportedImage {
            bytes,
            width,
            height,
            format: ImageFormat::Png,
        })
    }
}

// ============================================================================
// Markup
// ============================================================================

fn build_markup(layout: &RenderableLayout, g: &Geometry, qr: &QrMatrix) -> String {
    let style = &layout.style;
    let (width, height) = (g.width(), g.height());
    let radius = style.shape.corner_radius;
    let center = g.card_width / 2;

    let mut svg = String::with_capacity(16 * 1024);
    // Writing to a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    // Definitions
    let (from, to) = style.header.endpoints();
    let _ = write!(
        svg,
        r##"<defs><linearGradient id="header" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></linearGradient><clipPath id="card"><rect width="{cw}" height="{ch}" rx="{radius}"/></clipPath><clipPath id="avatar"><circle cx="{ax}" cy="{ay}" r="{AVATAR_RADIUS}"/></clipPath><filter id="shadow" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="0" dy="4" stdDeviation="{blur}" flood-color="#000000" flood-opacity="{opacity}"/></filter></defs>"##,
        cw = g.card_width,
        ch = g.card_height,
        ax = 24 + AVATAR_RADIUS,
        ay = HEADER_HEIGHT / 2,
        blur = style.shape.shadow.blur() / 2.0,
        opacity = style.shape.shadow.opacity(),
    );

    if let Background::Framed { frame } = style.background {
        let _ = write!(svg, r#"<rect width="{width}" height="{height}" fill="{frame}"/>"#);
    }

    // Card
    let _ = write!(
        svg,
        r#"<g transform="translate({m} {m})"><rect width="{cw}" height="{ch}" rx="{radius}" fill="{bg}" filter="url(#shadow)"/><g clip-path="url(#card)">"#,
        m = g.margin,
        cw = g.card_width,
        ch = g.card_height,
        bg = layout.background,
    );

    // Header
    let header_fill = match style.header {
        HeaderFill::Solid { color } => color.to_string(),
        HeaderFill::Gradient { .. } => "url(#header)".to_string(),
    };
    let _ = write!(
        svg,
        r#"<rect width="{cw}" height="{HEADER_HEIGHT}" fill="{header_fill}"/>"#,
        cw = g.card_width,
    );

    let text_x = if layout.header.logo.visible {
        write_avatar(&mut svg, &layout.header.logo.value, style.header_text);
        24 + AVATAR_RADIUS * 2 + 16
    } else {
        24
    };

    let name_y = if layout.header.description.visible { 54 } else { 66 };
    let _ = write!(
        svg,
        r#"<text x="{text_x}" y="{name_y}" font-family="{FONT_FAMILY}" font-size="22" font-weight="700" fill="{fill}">{name}</text>"#,
        fill = style.header_text,
        name = escape(&layout.header.name),
    );
    if let Some(description) = layout.header.description.shown() {
        let _ = write!(
            svg,
            r#"<text x="{text_x}" y="80" font-family="{FONT_FAMILY}" font-size="13" fill="{fill}" fill-opacity="0.85">{text}</text>"#,
            fill = style.header_text,
            text = escape(description),
        );
    }

    // Body
    if let Some(cta) = layout.body.call_to_action.shown() {
        let _ = write!(
            svg,
            r#"<text x="{center}" y="{y}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="16" font-weight="700" fill="{fill}">{text}</text>"#,
            y = g.cta_y,
            fill = style.footer_text,
            text = escape(cta),
        );
    }

    write_qr(&mut svg, qr, g, layout);

    if let Some(url) = layout.body.display_url.shown() {
        let _ = write!(
            svg,
            r#"<text x="{center}" y="{y}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="14" fill="{fill}">{text}</text>"#,
            y = g.url_y,
            fill = style.footer_text,
            text = escape(url),
        );
    }

    // Footer
    if layout.footer.visible {
        for (i, entry) in layout.footer.entries.iter().enumerate() {
            let _ = write!(
                svg,
                r#"<text x="{center}" y="{y}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="13" fill="{fill}"><tspan font-weight="700">{channel}</tspan> {label}</text>"#,
                y = g.footer_y + FOOTER_LINE * i as u32,
                fill = style.footer_text,
                channel = entry.channel.label(),
                label = escape(&entry.label),
            );
        }
    }
    if let Some(caption) = layout.footer.powered_by.shown() {
        let _ = write!(
            svg,
            r#"<text x="{center}" y="{y}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="11" fill="{fill}" fill-opacity="0.7">{text}</text>"#,
            y = g.powered_by_y,
            fill = style.footer_text,
            text = escape(caption),
        );
    }

    svg.push_str("</g>");

    if let Some(color) = style.border.color() {
        let stroke = style.border.width();
        let inset = stroke as f32 / 2.0;
        let _ = write!(
            svg,
            r#"<rect x="{inset}" y="{inset}" width="{w}" height="{h}" rx="{radius}" fill="none" stroke="{color}" stroke-width="{stroke}"/>"#,
            w = g.card_width as f32 - stroke as f32,
            h = g.card_height as f32 - stroke as f32,
        );
    }

    svg.push_str("</g></svg>");
    svg
}

fn write_avatar(svg: &mut String, avatar: &Avatar, text_color: HexColor) {
    let cx = 24 + AVATAR_RADIUS;
    let cy = HEADER_HEIGHT / 2;
    match avatar {
        Avatar::LogoAvailable { url } => {
            let size = AVATAR_RADIUS * 2;
            let _ = write!(
                svg,
                r##"<circle cx="{cx}" cy="{cy}" r="{AVATAR_RADIUS}" fill="#ffffff"/><image x="24" y="{y}" width="{size}" height="{size}" clip-path="url(#avatar)" preserveAspectRatio="xMidYMid slice" xlink:href="{href}"/>"##,
                y = cy - AVATAR_RADIUS,
                href = escape(url),
            );
        }
        Avatar::LogoUnavailable { initial } => {
            let _ = write!(
                svg,
                r#"<circle cx="{cx}" cy="{cy}" r="{AVATAR_RADIUS}" fill="{text_color}" fill-opacity="0.2"/><text x="{cx}" y="{ty}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="24" font-weight="700" fill="{text_color}">{text}</text>"#,
                ty = cy + 8,
                text = escape(initial),
            );
        }
    }
}

fn write_qr(svg: &mut String, qr: &QrMatrix, g: &Geometry, layout: &RenderableLayout) {
    // The QR background is transparent: only dark modules are painted.
    let module = g.qr_size as f32 / qr.width() as f32;
    let _ = write!(
        svg,
        r#"<g transform="translate({x} {y}) scale({module})" fill="{fill}" shape-rendering="crispEdges">"#,
        x = g.qr_x,
        y = g.qr_y,
        fill = layout.body.qr.foreground,
    );
    for (x, y, len) in qr.dark_runs() {
        let _ = write!(svg, r#"<rect x="{x}" y="{y}" width="{len}" height="1"/>"#);
    }
    svg.push_str("</g>");
}

/// Escapes text for use in XML content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Raster Conversion
// ============================================================================

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        let x = i as u32 % width;
        let y = i as u32 / width;
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compose;
    use crate::config::{ColorSlot, PosterConfig, PosterElement, QrSize};
    use crate::store::StoreProfile;
    use crate::style::PosterStyle;

    const URL: &str = "https://emprendego.shop/cafe-luna";

    fn exporter() -> SvgExporter {
        // Text is irrelevant to these assertions; skip the system font scan.
        SvgExporter::with_fontdb(1.0, Arc::new(usvg::fontdb::Database::new()))
    }

    fn layout(config: &PosterConfig) -> RenderableLayout {
        let store = StoreProfile::new("Café Luna", "cafe-luna").with_whatsapp("+56 9 1234 5678");
        compose(&store, URL, config)
    }

    #[test]
    fn markup_reflects_brand_gradient() {
        let config = PosterConfig::default().with_style(PosterStyle::Brand);
        let markup = exporter().render_markup(&layout(&config)).unwrap();

        assert!(markup.contains(r#"fill="url(#header)""#));
        assert!(markup.contains(r##"stop-color="#2563eb""##));
        assert!(markup.contains(r##"stop-color="#5896ff""##));
    }

    #[test]
    fn markup_shows_initial_and_url() {
        let markup = exporter().render_markup(&layout(&PosterConfig::default())).unwrap();
        assert!(markup.contains(">C</text>"));
        assert!(markup.contains(">emprendego.shop/cafe-luna</text>"));
        assert!(markup.contains("+56 9 1234 5678"));
        assert!(!markup.contains("<image"));
    }

    #[test]
    fn markup_omits_hidden_elements() {
        let config = PosterConfig::default()
            .toggle(PosterElement::Url)
            .toggle(PosterElement::Socials)
            .toggle(PosterElement::Logo);
        let markup = exporter().render_markup(&layout(&config)).unwrap();
        assert!(!markup.contains("emprendego.shop/cafe-luna</text>"));
        assert!(!markup.contains("WhatsApp"));
        assert!(!markup.contains(">C</text>"));
    }

    #[test]
    fn markup_escapes_text() {
        let store = StoreProfile::new("Pan & <Café>", "pan");
        let markup = exporter()
            .render_markup(&compose(&store, URL, &PosterConfig::default()))
            .unwrap();
        assert!(markup.contains("Pan &amp; &lt;Café&gt;"));
    }

    #[test]
    fn logo_is_referenced_as_image() {
        let store = StoreProfile::new("Luna", "luna").with_logo_url("https://cdn.example.com/a.png?x=1&y=2");
        let markup = exporter()
            .render_markup(&compose(&store, URL, &PosterConfig::default()))
            .unwrap();
        assert!(markup.contains(r#"xlink:href="https://cdn.example.com/a.png?x=1&amp;y=2""#));
    }

    #[test]
    fn linked_logo_is_not_read_from_disk() {
        let path = "httpposter-linked-logo.png";
        RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])).save(path).unwrap();

        let store = StoreProfile::new("Luna", "luna").with_logo_url(path);
        let l = compose(&store, URL, &PosterConfig::default());
        let rendered = exporter().render_image(&l);
        std::fs::remove_file(path).unwrap();

        assert!(matches!(l.header.logo.value, Avatar::LogoAvailable { .. }));
        let g = Geometry::measure(&l);
        let pixel = rendered
            .unwrap()
            .get_pixel(g.margin + 24 + AVATAR_RADIUS, g.margin + HEADER_HEIGHT / 2)
            .0;
        assert_eq!(pixel, [255, 255, 255, 255]);
    }

    #[test]
    fn poster_style_has_frame_and_cta() {
        let config = PosterConfig::default().with_style(PosterStyle::Poster);
        let l = layout(&config);
        let markup = exporter().render_markup(&l).unwrap();
        assert!(markup.contains(crate::composer::CALL_TO_ACTION));
        assert!(markup.contains(r#"stroke-width="6""#));
        assert_eq!(Geometry::measure(&l).margin, FRAME_MARGIN);
    }

    #[test]
    fn geometry_grows_with_qr_size() {
        let small = Geometry::measure(&layout(&PosterConfig::default().with_qr_size(QrSize::Small)));
        let large = Geometry::measure(&layout(&PosterConfig::default().with_qr_size(QrSize::Large)));
        assert_eq!(small.card_width, MIN_CARD_WIDTH);
        assert_eq!(large.card_width, 360 + CARD_PADDING * 2);
        assert!(large.card_height > small.card_height);
    }

    #[test]
    fn export_produces_png_of_expected_size() {
        let exporter = exporter();
        let l = layout(&PosterConfig::default());
        let exported = exporter.export(&l).unwrap();

        assert_eq!(exported.format, ImageFormat::Png);
        assert_eq!((exported.width, exported.height), exporter.canvas_size(&l));

        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert_eq!(decoded.width(), exported.width);
        assert_eq!(decoded.height(), exported.height);
    }

    #[test]
    fn qr_modules_use_foreground_color() {
        let config = PosterConfig::default().with_color(ColorSlot::Qr, HexColor::parse("#ff0000").unwrap());
        let l = layout(&config);
        let exporter = exporter();
        let raster = exporter.render_image(&l).unwrap();

        // The top-left finder module is always dark.
        let g = Geometry::measure(&l);
        let pixel = raster.get_pixel(g.margin + g.qr_x + 1, g.margin + g.qr_y + 1);
        assert_eq!(pixel.0, [255, 0, 0, 255]);
    }

    #[test]
    fn scale_multiplies_canvas() {
        let l = layout(&PosterConfig::default());
        let one = exporter().canvas_size(&l);
        let two = SvgExporter::with_fontdb(2.0, Arc::new(usvg::fontdb::Database::new())).canvas_size(&l);
        assert_eq!(two, (one.0 * 2, one.1 * 2));
    }

    #[test]
    fn unpremultiply_restores_channels() {
        assert_eq!(unpremultiply(0, 0, 0, 0), (0, 0, 0, 0));
        assert_eq!(unpremultiply(51, 0, 0, 51), (255, 0, 0, 51));
        assert_eq!(unpremultiply(10, 20, 30, 255), (10, 20, 30, 255));
    }
}
