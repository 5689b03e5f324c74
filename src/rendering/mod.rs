//! Report rendering
//!
//! Collected data is turned into HTML fragments and assigned to fixed
//! containers of the bundled report page, each identified by a stable id.

pub mod contrast;
pub mod fragments;

use crate::artifacts::Audit;
use regex::{Captures, Regex};
use std::sync::OnceLock;

const PAGE_TEMPLATE: &str = include_str!("popup.html");

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__SCOUT_([A-Z]+)__").expect("valid regex"))
}

/// Containers of the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Fonts,
    Colors,
    Images,
    Animations,
    Icons,
}

impl ContainerId {
    pub const ALL: [ContainerId; 5] = [
        ContainerId::Fonts,
        ContainerId::Colors,
        ContainerId::Images,
        ContainerId::Animations,
        ContainerId::Icons,
    ];

    /// Element id of the container in the report page
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerId::Fonts => "fonts",
            ContainerId::Colors => "colors",
            ContainerId::Images => "images",
            ContainerId::Animations => "animations",
            ContainerId::Icons => "icons",
        }
    }

    /// Name inside the template's `__SCOUT_<NAME>__` placeholder
    fn placeholder_name(&self) -> &'static str {
        match self {
            ContainerId::Fonts => "FONTS",
            ContainerId::Colors => "COLORS",
            ContainerId::Images => "IMAGES",
            ContainerId::Animations => "ANIMATIONS",
            ContainerId::Icons => "ICONS",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub hide_generic_fonts: bool,
}

/// Rendered fragments for every container, plus page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub url: String,
    pub fonts: String,
    pub colors: String,
    pub images: String,
    pub animations: String,
    pub icons: String,
}

impl Report {
    pub fn build(audit: &Audit, title: &str, url: &str, options: &RenderOptions) -> Self {
        let a = &audit.artifacts;
        Report {
            title: title.to_string(),
            url: url.to_string(),
            fonts: fragments::fonts_fragment(&a.fonts, options.hide_generic_fonts),
            colors: fragments::colors_fragment(&a.colors),
            images: fragments::images_fragment(&a.images),
            animations: fragments::animations_fragment(&audit.animations),
            icons: fragments::icons_fragment(&a.inline_svgs, &a.svg_images),
        }
    }

    pub fn fragment(&self, id: ContainerId) -> &str {
        match id {
            ContainerId::Fonts => &self.fonts,
            ContainerId::Colors => &self.colors,
            ContainerId::Images => &self.images,
            ContainerId::Animations => &self.animations,
            ContainerId::Icons => &self.icons,
        }
    }

    /// Assign every fragment into its container of the report page.
    ///
    /// Placeholders are substituted in one pass over the template, so page
    /// data that happens to contain `__SCOUT_..__` is never expanded.
    pub fn to_page(&self) -> String {
        let title = if self.title.is_empty() { &self.url } else { &self.title };
        placeholder_re()
            .replace_all(PAGE_TEMPLATE, |caps: &Captures| match &caps[1] {
                "TITLE" => fragments::escape_text(title),
                "URL" => fragments::escape_text(&self.url),
                name => ContainerId::ALL
                    .iter()
                    .find(|id| id.placeholder_name() == name)
                    .map(|id| self.fragment(*id).to_string())
                    .unwrap_or_else(|| caps[0].to_string()),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{AnimationEntry, ArtifactSet};

    fn sample_audit() -> Audit {
        Audit {
            artifacts: ArtifactSet {
                fonts: vec!["Arial, sans-serif".into()],
                colors: vec!["rgb(0, 0, 0)".into()],
                images: vec!["https://x.test/a.png".into()],
                ..Default::default()
            },
            animations: vec![AnimationEntry {
                selector: ".a".into(),
                animation: Some("spin 1s".into()),
                transition: None,
                source: "https://x.test/s.css".into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn page_contains_every_container_once() {
        let report = Report::build(&sample_audit(), "Demo", "https://x.test/", &RenderOptions::default());
        let page = report.to_page();
        for id in ContainerId::ALL {
            let marker = format!("<section id=\"{}\">", id.as_str());
            assert_eq!(page.matches(&marker).count(), 1, "container {}", id.as_str());
        }
        assert!(!page.contains("__SCOUT_"));
        assert!(page.contains("<div>Arial, sans-serif</div>"));
        assert!(page.contains("spin 1s"));
        assert!(page.contains("<title>stylescout: Demo</title>"));
    }

    #[test]
    fn page_data_is_not_expanded_as_placeholders() {
        let audit = Audit {
            artifacts: ArtifactSet {
                images: vec!["https://x.test/__SCOUT_ICONS__.png".into()],
                inline_svgs: vec!["<svg><rect/></svg>".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        let report = Report::build(&audit, "__SCOUT_FONTS__", "https://x.test/", &RenderOptions::default());
        let page = report.to_page();
        assert_eq!(page.matches("class=\"icon\"").count(), 1);
        assert!(page.contains("https://x.test/__SCOUT_ICONS__.png"));
        assert!(page.contains("<title>stylescout: __SCOUT_FONTS__</title>"));
    }

    #[test]
    fn hides_generic_families_on_request() {
        let options = RenderOptions { hide_generic_fonts: true };
        let report = Report::build(&sample_audit(), "", "https://x.test/", &options);
        assert_eq!(report.fragment(ContainerId::Fonts), "Arial");
        assert!(report.to_page().contains("<h1>https://x.test/</h1>"));
    }
}
