use super::Context;
use crate::output::{layout_table, results_table, section_header, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reelwall_core::{LayoutEngine, Viewport};
use serde_json::json;
use std::str::FromStr;

/// `--layout` argument, `WIDTHxHEIGHT` in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl FromStr for CanvasSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("invalid dimension '{}'", v))
        };
        Ok(Self {
            width: f64::from(parse(w)?),
            height: f64::from(parse(h)?),
        })
    }
}

pub async fn run_search(
    query: Option<String>,
    server: Option<String>,
    canvas: Option<CanvasSize>,
    output: &Output,
) -> Result<()> {
    let ctx = Context::load()?;
    let source = ctx.source(server.as_deref())?;
    let query = query.unwrap_or_default();

    let results = source
        .search(&query)
        .await
        .map_err(|e| eyre!("Error fetching results: {}", e))?;

    let layout = canvas.map(|size| {
        let viewport = Viewport::with_search_band(size.width, size.height);
        let engine = LayoutEngine::from_config(&ctx.config.layout);
        let pass = engine.place(0..results.len(), &viewport, &mut StdRng::from_os_rng());
        (viewport, pass)
    });

    if !output.is_human() {
        let placements = layout.as_ref().map(|(viewport, pass)| {
            pass.placements
                .iter()
                .filter_map(|p| results.get(p.item).map(|r| (r, p.rect)))
                .map(|(r, rect)| json!({ "id": r.id, "rect": rect.map(|rect| rect.relative_to(&viewport.container)) }))
                .collect::<Vec<_>>()
        });
        output.json(&json!({ "results": results, "layout": placements }));
        return Ok(());
    }

    if results.is_empty() {
        output.warn("No results");
        return Ok(());
    }

    output.info(section_header(&format!("{} results", results.len())));
    output.table(&results_table(&results));

    if let Some((viewport, pass)) = layout {
        output.info(section_header(&format!(
            "Layout {}x{} ({} of {} placed)",
            viewport.container.width,
            viewport.container.height,
            pass.placed_count(),
            pass.len()
        )));
        output.table(&layout_table(&results, &pass, &viewport.container));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_parse() {
        assert_eq!(
            "1280x800".parse::<CanvasSize>().unwrap(),
            CanvasSize { width: 1280.0, height: 800.0 }
        );
        assert_eq!("640X480".parse::<CanvasSize>().unwrap().height, 480.0);
    }

    #[test]
    fn test_canvas_size_rejects_garbage() {
        assert!("1280".parse::<CanvasSize>().is_err());
        assert!("0x800".parse::<CanvasSize>().is_err());
        assert!("wide x tall".parse::<CanvasSize>().is_err());
    }
}
