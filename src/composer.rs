//! Composes store data and a poster config into a [`RenderableLayout`].

use tracing::trace;

use crate::config::PosterConfig;
use crate::layout::{
    Avatar, BodyBlock, Element, FooterBlock, HeaderBlock, QrBackground, QrBlock, RenderableLayout,
    SocialChannel, SocialEntry,
};
use crate::store::StoreProfile;
use crate::style::resolve;

/// Shown when a store has neither a name nor a slug.
pub const PLACEHOLDER_NAME: &str = "Mi Tienda";

/// Descriptions longer than this many characters are truncated.
pub const DESCRIPTION_LIMIT: usize = 40;

pub const ELLIPSIS: &str = "...";

pub const CALL_TO_ACTION: &str = "¡Escanea y visita nuestra tienda!";

pub const POWERED_BY: &str = "Creado con EmprendeGo";

/// Builds the poster layout.
///
/// Pure and infallible: identical inputs always produce identical layouts.
/// `target_url` is assumed to be a fully-qualified URL and is encoded into the
/// QR payload untouched.
///
/// ```
/// use emprendego_poster::{compose, Avatar, PosterConfig, StoreProfile};
///
/// let store = StoreProfile::new("Café Luna", "cafe-luna");
/// let layout = compose(&store, "https://emprendego.shop/cafe-luna", &PosterConfig::default());
///
/// assert_eq!(layout.header.logo.value, Avatar::LogoUnavailable { initial: "C".into() });
/// assert_eq!(layout.body.display_url.value, "emprendego.shop/cafe-luna");
/// assert_eq!(layout.body.qr.payload, "https://emprendego.shop/cafe-luna");
/// ```
pub fn compose(store: &StoreProfile, target_url: &str, config: &PosterConfig) -> RenderableLayout {
    let style = resolve(config.style, config.brand_color);
    let name = display_name(store);

    let header = HeaderBlock {
        logo: Element::new(config.show_logo, avatar(store, &name)),
        description: match present(store.description.as_deref()) {
            Some(text) => Element::new(true, truncate_description(text)),
            None => Element::new(false, String::new()),
        },
        name,
    };

    let body = BodyBlock {
        call_to_action: Element::new(style.has_call_to_action, CALL_TO_ACTION.to_string()),
        qr: QrBlock {
            payload: target_url.to_string(),
            size: config.qr_size,
            foreground: config.qr_color,
            background: QrBackground::Transparent,
        },
        display_url: Element::new(config.show_url, display_url(target_url).to_string()),
    };

    let entries = social_entries(store);
    let footer = FooterBlock {
        visible: config.show_socials && !entries.is_empty(),
        entries,
        powered_by: Element::new(true, POWERED_BY.to_string()),
    };

    trace!(
        style = style.style.id(),
        footer = footer.visible,
        "composed poster layout for {:?}",
        header.name
    );

    RenderableLayout {
        style,
        background: config.bg_color,
        header,
        body,
        footer,
    }
}

/// Shortens a URL for display under the code.
///
/// Strips one leading `https://`, then one `http://`, then one `www.`.
pub fn display_url(target_url: &str) -> &str {
    let url = target_url.strip_prefix("https://").unwrap_or(target_url);
    let url = url.strip_prefix("http://").unwrap_or(url);
    url.strip_prefix("www.").unwrap_or(url)
}

/// Store name, then slug, then [`PLACEHOLDER_NAME`].
pub fn display_name(store: &StoreProfile) -> String {
    present(Some(store.name.as_str()))
        .or_else(|| present(Some(store.slug.as_str())))
        .unwrap_or(PLACEHOLDER_NAME)
        .to_string()
}

/// Upper-cased first character of `name`.
pub fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Keeps the first [`DESCRIPTION_LIMIT`] characters, marking the cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn avatar(store: &StoreProfile, name: &str) -> Avatar {
    match present(store.logo_url.as_deref()) {
        Some(url) if url.starts_with("http") => Avatar::LogoAvailable {
            url: url.to_string(),
        },
        _ => Avatar::LogoUnavailable {
            initial: initial(name),
        },
    }
}

fn social_entries(store: &StoreProfile) -> Vec<SocialEntry> {
    let links = &store.social_links;
    let handles = [
        (SocialChannel::Instagram, links.instagram.as_deref()),
        (SocialChannel::Facebook, links.facebook.as_deref()),
        (SocialChannel::TikTok, links.tiktok.as_deref()),
    ];

    let mut entries: Vec<SocialEntry> = handles
        .into_iter()
        .filter_map(|(channel, handle)| {
            let handle = present(handle)?;
            let handle = handle.strip_prefix('@').unwrap_or(handle);
            Some(SocialEntry {
                channel,
                label: format!("@{handle}"),
            })
        })
        .collect();

    if let Some(number) = present(store.whatsapp.as_deref()) {
        entries.push(SocialEntry {
            channel: SocialChannel::WhatsApp,
            label: number.to_string(),
        });
    }

    entries
}

// Blank strings from the data layer count as missing. Non-blank values pass
// through untouched.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{HexColor, adjust};
    use crate::config::{PosterElement, QrSize};
    use crate::store::SocialLinks;
    use crate::style::{HeaderFill, PosterStyle};

    const URL: &str = "https://emprendego.shop/tienda/demo";

    fn demo_store() -> StoreProfile {
        StoreProfile::new("Demo", "demo")
    }

    #[test]
    fn display_url_strips_scheme_and_www() {
        assert_eq!(display_url("https://www.emprendego.shop/tienda/demo"), "emprendego.shop/tienda/demo");
        assert_eq!(display_url("http://foo.bar"), "foo.bar");
        assert_eq!(display_url("http://www.foo.bar/x"), "foo.bar/x");
        assert_eq!(display_url("foo.bar"), "foo.bar");
    }

    #[test]
    fn display_url_strips_each_prefix_once() {
        assert_eq!(display_url("https://www.www.foo.bar"), "www.foo.bar");
        assert_eq!(display_url("https://http://foo.bar"), "foo.bar");
        assert_eq!(display_url("http://https://foo.bar"), "https://foo.bar");
    }

    #[test]
    fn qr_payload_is_untouched_target() {
        let target = "https://www.emprendego.shop/tienda/demo?ref=poster";
        let layout = compose(&demo_store(), target, &PosterConfig::default());
        assert_eq!(layout.body.qr.payload, target);
        assert_eq!(layout.body.display_url.value, "emprendego.shop/tienda/demo?ref=poster");
    }

    #[test]
    fn name_fallback_chain() {
        assert_eq!(display_name(&StoreProfile::new("Luna", "luna")), "Luna");
        assert_eq!(display_name(&StoreProfile::new("", "demo")), "demo");
        assert_eq!(display_name(&StoreProfile::new("", "")), "Mi Tienda");
        assert_eq!(display_name(&StoreProfile::new("   ", "")), "Mi Tienda");
    }

    #[test]
    fn display_name_is_not_trimmed() {
        assert_eq!(display_name(&StoreProfile::new("  Luna  ", "luna")), "  Luna  ");
        assert_eq!(display_name(&StoreProfile::new(" ", " demo")), " demo");
    }

    #[test]
    fn initial_is_uppercased_first_char() {
        assert_eq!(initial("café"), "C");
        assert_eq!(initial("émile"), "É");
        assert_eq!(initial("ß-shop"), "SS");
        assert_eq!(initial(""), "");
    }

    #[test]
    fn placeholder_name_gets_initial_m() {
        let layout = compose(&StoreProfile::new("", ""), URL, &PosterConfig::default());
        assert_eq!(layout.header.name, "Mi Tienda");
        assert_eq!(
            layout.header.logo.value,
            Avatar::LogoUnavailable {
                initial: "M".into()
            }
        );
    }

    #[test]
    fn absolute_logo_is_used() {
        let store = demo_store().with_logo_url("https://cdn.example.com/logo.png");
        let layout = compose(&store, URL, &PosterConfig::default());
        assert_eq!(
            layout.header.logo.value,
            Avatar::LogoAvailable {
                url: "https://cdn.example.com/logo.png".into()
            }
        );
        assert!(layout.header.logo.visible);
    }

    #[test]
    fn relative_or_blank_logo_falls_back_to_initial() {
        for logo in ["/uploads/logo.png", "", "logo.png"] {
            let store = demo_store().with_logo_url(logo);
            let layout = compose(&store, URL, &PosterConfig::default());
            assert_eq!(
                layout.header.logo.value,
                Avatar::LogoUnavailable {
                    initial: "D".into()
                },
                "{logo:?}"
            );
        }
    }

    #[test]
    fn hidden_logo_keeps_structure() {
        let config = PosterConfig::default().toggle(PosterElement::Logo);
        let layout = compose(&demo_store(), URL, &config);
        assert!(!layout.header.logo.visible);
        assert!(layout.header.logo.shown().is_none());
        assert!(matches!(layout.header.logo.value, Avatar::LogoUnavailable { .. }));
    }

    #[test]
    fn description_truncation() {
        let long = "a".repeat(50);
        assert_eq!(truncate_description(&long), format!("{}...", "a".repeat(40)));

        let short = "b".repeat(30);
        assert_eq!(truncate_description(&short), short);

        let exact = "c".repeat(40);
        assert_eq!(truncate_description(&exact), exact);
    }

    #[test]
    fn description_truncation_counts_characters() {
        let accented = "é".repeat(45);
        let truncated = truncate_description(&accented);
        assert_eq!(truncated.chars().count(), 43);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn description_is_truncated_on_its_raw_length() {
        let trailing = format!("{} ", "a".repeat(40));
        let store = demo_store().with_description(&trailing);
        let layout = compose(&store, URL, &PosterConfig::default());
        assert_eq!(layout.header.description.value, format!("{}...", "a".repeat(40)));

        let leading = format!("  {}", "b".repeat(39));
        let store = demo_store().with_description(&leading);
        let layout = compose(&store, URL, &PosterConfig::default());
        assert_eq!(
            layout.header.description.value,
            format!("  {}...", "b".repeat(38))
        );
    }

    #[test]
    fn missing_description_is_hidden() {
        let layout = compose(&demo_store(), URL, &PosterConfig::default());
        assert!(!layout.header.description.visible);

        let store = demo_store().with_description("Pan artesanal");
        let layout = compose(&store, URL, &PosterConfig::default());
        assert_eq!(layout.header.description.shown().map(String::as_str), Some("Pan artesanal"));
    }

    #[test]
    fn footer_hidden_without_channels() {
        let layout = compose(&demo_store(), URL, &PosterConfig::default());
        assert!(!layout.footer.visible);
        assert!(layout.footer.entries.is_empty());
        assert!(layout.footer.powered_by.visible);
    }

    #[test]
    fn footer_shows_whatsapp_only() {
        let store = demo_store().with_whatsapp("+1234");
        let layout = compose(&store, URL, &PosterConfig::default());
        assert!(layout.footer.visible);
        assert_eq!(
            layout.footer.entries,
            vec![SocialEntry {
                channel: SocialChannel::WhatsApp,
                label: "+1234".into()
            }]
        );
    }

    #[test]
    fn footer_normalizes_handles_in_order() {
        let store = demo_store()
            .with_whatsapp("+56 9 1234 5678")
            .with_social_links(SocialLinks {
                instagram: Some("@demo.shop".into()),
                facebook: Some("demoshop".into()),
                tiktok: Some("@@demo".into()),
            });
        let layout = compose(&store, URL, &PosterConfig::default());

        let labels: Vec<_> = layout
            .footer
            .entries
            .iter()
            .map(|e| (e.channel, e.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (SocialChannel::Instagram, "@demo.shop"),
                (SocialChannel::Facebook, "@demoshop"),
                (SocialChannel::TikTok, "@@demo"),
                (SocialChannel::WhatsApp, "+56 9 1234 5678"),
            ]
        );
    }

    #[test]
    fn footer_hidden_when_socials_toggled_off() {
        let store = demo_store().with_whatsapp("+1234");
        let config = PosterConfig::default().toggle(PosterElement::Socials);
        let layout = compose(&store, URL, &config);
        assert!(!layout.footer.visible);
        assert_eq!(layout.footer.entries.len(), 1);
    }

    #[test]
    fn blank_handles_are_skipped() {
        let store = demo_store().with_whatsapp(" ").with_social_links(SocialLinks {
            instagram: Some(String::new()),
            ..SocialLinks::default()
        });
        let layout = compose(&store, URL, &PosterConfig::default());
        assert!(!layout.footer.visible);
    }

    #[test]
    fn qr_block_follows_config_and_stays_transparent() {
        let config = PosterConfig::default()
            .with_qr_size(QrSize::Large)
            .with_color(crate::config::ColorSlot::Qr, HexColor::parse("#000000").unwrap())
            .with_color(crate::config::ColorSlot::Background, HexColor::parse("#fef3c7").unwrap());
        let layout = compose(&demo_store(), URL, &config);

        assert_eq!(layout.body.qr.size.pixels(), 360);
        assert_eq!(layout.body.qr.foreground.to_string(), "#000000");
        assert_eq!(layout.body.qr.background, QrBackground::Transparent);
        assert_eq!(layout.background.to_string(), "#fef3c7");
    }

    #[test]
    fn call_to_action_only_on_poster() {
        for style in PosterStyle::ALL {
            let layout = compose(&demo_store(), URL, &PosterConfig::default().with_style(style));
            assert_eq!(layout.body.call_to_action.visible, style == PosterStyle::Poster);
        }
    }

    #[test]
    fn url_visibility_mirrors_config() {
        let config = PosterConfig::default().toggle(PosterElement::Url);
        let layout = compose(&demo_store(), URL, &config);
        assert!(!layout.body.display_url.visible);
        assert_eq!(layout.body.display_url.value, "emprendego.shop/tienda/demo");
    }

    #[test]
    fn compose_is_deterministic() {
        let store = demo_store()
            .with_description("Una descripción bastante larga para que se corte en algún punto")
            .with_whatsapp("+1234");
        let config = PosterConfig::default().with_style(PosterStyle::Brand);
        assert_eq!(compose(&store, URL, &config), compose(&store, URL, &config));
    }

    #[test]
    fn brand_scenario() {
        let store = StoreProfile::new("Café Luna", "cafe-luna");
        let config = PosterConfig::default()
            .with_style(PosterStyle::Brand)
            .with_visibility(PosterElement::Socials, false);
        let layout = compose(&store, "https://emprendego.shop/cafe-luna", &config);

        assert_eq!(
            layout.header.logo.value,
            Avatar::LogoUnavailable {
                initial: "C".into()
            }
        );
        assert_eq!(
            layout.style.header,
            HeaderFill::Gradient {
                from: config.brand_color,
                to: adjust(config.brand_color, 20)
            }
        );
        assert_eq!(layout.body.display_url.value, "emprendego.shop/cafe-luna");
        assert!(!layout.footer.visible);
    }
}
