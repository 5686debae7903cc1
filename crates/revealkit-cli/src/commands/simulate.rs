use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::info;

use revealkit_core::{
    AppConfig, Document, FrameInput, FrameReport, Page, PageDocument, ScrollInput, SectionState,
};

pub struct Options {
    pub to: Option<f64>,
    pub seconds: f64,
    pub settle: f64,
    pub fps: u32,
    pub wheel: bool,
    pub realtime: bool,
    pub json: bool,
}

/// Final state of the page, printed after the last frame
#[derive(Debug, Serialize)]
struct Summary {
    frames: u64,
    scroll_y: f64,
    sections: BTreeMap<&'static str, SectionState>,
    styles: BTreeMap<String, BTreeMap<&'static str, f64>>,
}

/// Frame inputs for a scroll to `target` over `seconds`, then `settle`
/// seconds of no input
pub fn scroll_script(target: f64, seconds: f64, settle: f64, fps: u32, wheel: bool) -> Vec<ScrollInput> {
    let fps = f64::from(fps.max(1));
    let moving = ((seconds * fps).ceil() as usize).max(1);
    let holding = (settle.max(0.0) * fps).ceil() as usize;

    let mut script: Vec<ScrollInput> = (1..=moving)
        .map(|frame| {
            if wheel {
                ScrollInput::Wheel(target / moving as f64)
            } else {
                ScrollInput::Jump(target * frame as f64 / moving as f64)
            }
        })
        .collect();
    script.extend(std::iter::repeat(ScrollInput::Hold).take(holding));
    script
}

/// Optional wall-clock pacing for frames
pub struct Pacer {
    interval: Option<Interval>,
}

impl Pacer {
    pub fn new(realtime: bool, dt: f64) -> Self {
        let interval = realtime.then(|| {
            let mut interval = tokio::time::interval(Duration::from_secs_f64(dt));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        Self { interval }
    }

    /// Wait for the next frame slot; returns immediately when not pacing
    pub async fn tick(&mut self) {
        if let Some(interval) = &mut self.interval {
            interval.tick().await;
        }
    }
}

pub async fn run(config: &AppConfig, layout: &Path, options: &Options) -> Result<()> {
    if options.fps == 0 {
        bail!("--fps must be greater than 0");
    }
    if options.seconds < 0.0 {
        bail!("--seconds must not be negative");
    }

    let (mut doc, viewport) = super::load_page(layout)?;
    let mut page = Page::init(&mut doc, config);

    let limit = (doc.scroll_height() - viewport.height).max(0.0);
    let target = options.to.unwrap_or(limit).clamp(0.0, limit);
    let script = scroll_script(target, options.seconds, options.settle, options.fps, options.wheel);
    let dt = 1.0 / f64::from(options.fps);
    info!(
        frames = script.len(),
        target,
        wheel = options.wheel,
        "Simulating scroll"
    );

    if !options.json {
        println!(
            "Scrolling {} to {}px over {}s ({} frames)\n",
            layout.display(),
            target,
            options.seconds,
            script.len()
        );
    }

    let mut pacer = Pacer::new(options.realtime, dt);
    let mut last = None;
    for input in script {
        pacer.tick().await;
        let report = page.frame(&mut doc, FrameInput::new(dt, input, viewport));
        print_frame(&report, options.json)?;
        last = Some(report);
    }

    let summary = Summary {
        frames: last.as_ref().map(|r| r.frame).unwrap_or(0),
        scroll_y: page.scroll_y(),
        sections: page.states().into_iter().collect(),
        styles: styles(&doc),
    };
    print_summary(&summary, options.json)?;

    Ok(())
}

fn print_frame(report: &FrameReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    for entry in &report.entries {
        println!(
            "[{:>6.2}s y={:>7.1}] {} entered ({:.0}% visible)",
            report.time,
            report.scroll_y,
            entry.section,
            entry.event.ratio * 100.0
        );
    }
    Ok(())
}

fn print_summary(summary: &Summary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&serde_json::json!({ "summary": summary }))?);
        return Ok(());
    }

    println!("\nAfter {} frames at y={:.1}:", summary.frames, summary.scroll_y);
    for (section, state) in &summary.sections {
        println!("  {:<12} {:?}", section, state);
    }

    println!("\nStyles:");
    for (element, styles) in &summary.styles {
        let values: Vec<String> = styles
            .iter()
            .map(|(name, value)| format!("{}={:.2}", name, value))
            .collect();
        println!("  {:<32} {}", element, values.join(" "));
    }
    Ok(())
}

/// Inline styles of every element that has any
fn styles(doc: &PageDocument) -> BTreeMap<String, BTreeMap<&'static str, f64>> {
    doc.elements()
        .filter_map(|id| {
            let styles = doc.inline_styles(id);
            if styles.is_empty() {
                return None;
            }
            let values = styles.into_iter().map(|(p, v)| (p.name(), v)).collect();
            Some((doc.label(id), values))
        })
        .collect()
}
