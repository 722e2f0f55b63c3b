//! Standalone HTML viewer pages backed by 3Dmol.js.

use crate::align::ProteinAlignment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_VIEW_SIZE: u32 = 500;

const VIEWER_SCRIPT_URL: &str = "https://3Dmol.org/build/3Dmol-min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleculeColor {
    Red,
    Blue,
    Yellow,
    Green,
    #[default]
    Spectrum,
}

impl MoleculeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoleculeColor::Red => "red",
            MoleculeColor::Blue => "blue",
            MoleculeColor::Yellow => "yellow",
            MoleculeColor::Green => "green",
            MoleculeColor::Spectrum => "spectrum",
        }
    }
}

impl fmt::Display for MoleculeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoleculeColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(MoleculeColor::Red),
            "blue" => Ok(MoleculeColor::Blue),
            "yellow" => Ok(MoleculeColor::Yellow),
            "green" => Ok(MoleculeColor::Green),
            "spectrum" => Ok(MoleculeColor::Spectrum),
            _ => Err(format!(
                "Unknown color '{}'. Expected red, blue, yellow, green or spectrum.",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ViewModel {
    pdb: String,
    color: MoleculeColor,
}

/// A set of structures drawn as cartoons in one viewer, one style per model index.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeView {
    width: u32,
    height: u32,
    models: Vec<ViewModel>,
}

impl Default for MoleculeView {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_SIZE, DEFAULT_VIEW_SIZE)
    }
}

impl MoleculeView {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            models: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn molecule_count(&self) -> usize {
        self.models.len()
    }

    pub fn add_molecule(&mut self, pdb: impl Into<String>, color: MoleculeColor) -> &mut Self {
        self.models.push(ViewModel {
            pdb: pdb.into(),
            color,
        });
        self
    }

    /// Drops every model; the view size is kept.
    pub fn reset(&mut self) {
        self.models.clear();
    }

    pub fn render_html(&self) -> String {
        // `</` inside the embedded JSON would end the script element early.
        let models = serde_json::to_string(&self.models)
            .unwrap_or_else(|_| "[]".to_string())
            .replace("</", "<\\/");

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>plmbench viewer</title>
<script src="{script}"></script>
</head>
<body>
<div id="viewer" style="width: {width}px; height: {height}px; position: relative;"></div>
<script>
const viewer = $3Dmol.createViewer(document.getElementById("viewer"), {{ backgroundColor: "white" }});
const models = {models};
models.forEach((model, index) => {{
  viewer.addModel(model.pdb, "pdb");
  viewer.setStyle({{ model: index }}, {{ cartoon: {{ color: model.color }} }});
}});
viewer.zoomTo();
viewer.render();
</script>
</body>
</html>
"#,
            script = VIEWER_SCRIPT_URL,
            width = self.width,
            height = self.height,
            models = models,
        )
    }

    pub fn save_html(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render_html())
    }

    /// Renders both input structures of an alignment, then resets the view.
    pub fn view_alignment(
        &mut self,
        alignment: &ProteinAlignment,
        color1: MoleculeColor,
        color2: MoleculeColor,
    ) -> String {
        self.view_comparison(&alignment.pdb1, &alignment.pdb2, color1, color2)
    }

    /// Renders two structures side by side in one scene, then resets the view.
    pub fn view_comparison(
        &mut self,
        pdb1: &str,
        pdb2: &str,
        color1: MoleculeColor,
        color2: MoleculeColor,
    ) -> String {
        self.add_molecule(pdb1, color1).add_molecule(pdb2, color2);
        let html = self.render_html();
        self.reset();
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn models_are_styled_by_index_and_color() {
        let mut view = MoleculeView::default();
        view.add_molecule("ATOM A\n", MoleculeColor::Red)
            .add_molecule("ATOM B\n", MoleculeColor::Blue);
        assert_eq!(view.molecule_count(), 2);

        let html = view.render_html();
        assert!(html.contains("width: 500px; height: 500px"));
        assert!(html.contains(r#"{"pdb":"ATOM A\n","color":"red"}"#));
        assert!(html.contains(r#""color":"blue""#));
        assert!(html.contains("viewer.zoomTo();"));
    }

    #[test]
    fn embedded_pdb_cannot_close_the_script() {
        let mut view = MoleculeView::new(300, 200);
        view.add_molecule("REMARK </script><b>", MoleculeColor::Spectrum);
        let html = view.render_html();
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn comparison_renders_then_resets() {
        let mut view = MoleculeView::new(640, 480);
        let html = view.view_comparison("P1", "P2", MoleculeColor::Yellow, MoleculeColor::Green);
        assert!(html.contains(r#""color":"yellow""#));
        assert!(html.contains(r#""pdb":"P2""#));
        assert_eq!(view.molecule_count(), 0);
        assert_eq!(view.size(), (640, 480));
    }

    #[test]
    fn save_html_writes_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("views/page.html");
        let mut view = MoleculeView::default();
        view.add_molecule("P", MoleculeColor::default());
        view.save_html(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn colors_parse_case_insensitively() {
        assert_eq!("RED".parse::<MoleculeColor>().unwrap(), MoleculeColor::Red);
        assert!("purple".parse::<MoleculeColor>().is_err());
        assert_eq!(MoleculeColor::Spectrum.to_string(), "spectrum");
    }
}
