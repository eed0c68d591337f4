use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::{
    coloring::colors,
    error::{InfectionError, Result},
    generator::InfectionGraph,
    infection::{InfectedSet, InfectionKind, StepSink},
    layout::{ForceLayout, Layout},
};

mod draw;
mod shapes;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Writes one PNG snapshot per infection step.
///
/// The layout is computed once when the renderer is built, so every snapshot
/// of a run shows the nodes at the same place.
pub struct Renderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    node_radius: f32,
    label_scale: u32,
    positions: Vec<Vec2>,
}

impl Renderer {
    pub fn builder() -> RendererBuilder {
        RendererBuilder::default()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output_dir>/<stem><step>.png`
    pub fn snapshot_path(&self, kind: InfectionKind, step: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.png", kind.file_stem(), step))
    }

    /// Draws the graph with infected nodes in red and the rest in green.
    /// Every call starts from a blank canvas.
    pub fn draw(&self, graph: &InfectionGraph, infected: &InfectedSet) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, BACKGROUND);

        draw::draw_edges(&mut canvas, graph, &self.positions, self.node_radius);
        draw::draw_nodes(
            &mut canvas,
            &self.positions,
            &colors(graph, infected),
            self.node_radius,
        );
        draw::draw_labels(&mut canvas, graph, &self.positions, self.label_scale);

        canvas
    }

    /// Draws and saves a snapshot, returning the written path
    pub fn render(
        &self,
        graph: &InfectionGraph,
        infected: &InfectedSet,
        kind: InfectionKind,
        step: usize,
    ) -> Result<PathBuf> {
        let path = self.snapshot_path(kind, step);
        self.draw(graph, infected)
            .save(&path)
            .map_err(|source| InfectionError::Image {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), infected = infected.len(), "snapshot written");
        Ok(path)
    }
}

impl StepSink for Renderer {
    fn step(
        &mut self,
        graph: &InfectionGraph,
        infected: &InfectedSet,
        kind: InfectionKind,
        step: usize,
    ) -> Result<()> {
        self.render(graph, infected, kind, step).map(|_| ())
    }
}

/// Builder for `Renderer`
pub struct RendererBuilder {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    node_radius: f32,
    label_scale: u32,
    margin: f32,
    layout: ForceLayout,
}

impl RendererBuilder {
    /// Get a Instance of `RendererBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the snapshots get written to. Created if missing.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Image size in pixels
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Radius of a node in pixels
    pub fn node_radius(mut self, node_radius: f32) -> Self {
        self.node_radius = node_radius;
        self
    }

    /// Pixel size of one dot of a label digit
    pub fn label_scale(mut self, label_scale: u32) -> Self {
        self.label_scale = label_scale;
        self
    }

    /// Space kept free around the graph in pixels
    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Force simulation used to place the nodes
    pub fn layout(mut self, layout: ForceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Lays out `graph` and prepares the output directory
    pub fn build(self, graph: &InfectionGraph) -> Result<Renderer> {
        let layout = self.layout.layout(graph);
        self.build_with_layout(&layout)
    }

    /// Uses a precomputed layout instead of running the simulation
    pub fn build_with_layout(self, layout: &Layout) -> Result<Renderer> {
        fs::create_dir_all(&self.output_dir).map_err(|source| InfectionError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let margin = self.margin + self.node_radius;
        Ok(Renderer {
            positions: layout.fit(self.width, self.height, margin),
            output_dir: self.output_dir,
            width: self.width,
            height: self.height,
            node_radius: self.node_radius,
            label_scale: self.label_scale,
        })
    }
}

impl Default for RendererBuilder {
    /// 800x800 images in the current directory
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            width: 800,
            height: 800,
            node_radius: 10.0,
            label_scale: 2,
            margin: 10.0,
            layout: ForceLayout::builder().build(),
        }
    }
}
