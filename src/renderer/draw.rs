use glam::Vec2;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut,
};
use petgraph::visit::EdgeRef;

use super::shapes;
use crate::{coloring::NodeColor, generator::InfectionGraph};

const EDGE_COLOR: Rgb<u8> = Rgb([90, 90, 90]);
const OUTLINE_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

fn point(v: Vec2) -> (f32, f32) {
    (v.x, v.y)
}

pub fn draw_edges(
    canvas: &mut RgbImage,
    graph: &InfectionGraph,
    positions: &[Vec2],
    node_radius: f32,
) {
    let arrow_size = node_radius * 0.9;

    for edge in graph.edge_references() {
        let (Some(&from), Some(&to)) = (
            positions.get(edge.source().index()),
            positions.get(edge.target().index()),
        ) else {
            continue;
        };

        let Some((start, end)) = shapes::edge(from, to, node_radius) else {
            continue;
        };
        draw_line_segment_mut(canvas, point(start), point(end), EDGE_COLOR);

        if let Some(strokes) = shapes::arrow_head(from, to, node_radius, arrow_size) {
            for (a, b) in strokes {
                draw_line_segment_mut(canvas, point(a), point(b), EDGE_COLOR);
            }
        }
    }
}

pub fn draw_nodes(
    canvas: &mut RgbImage,
    positions: &[Vec2],
    colors: &[NodeColor],
    node_radius: f32,
) {
    let radius = node_radius.round() as i32;

    for (position, color) in positions.iter().zip(colors) {
        let center = (position.x.round() as i32, position.y.round() as i32);
        draw_filled_circle_mut(canvas, center, radius, color.rgb());
        draw_hollow_circle_mut(canvas, center, radius, OUTLINE_COLOR);
    }
}

pub fn draw_labels(canvas: &mut RgbImage, graph: &InfectionGraph, positions: &[Vec2], scale: u32) {
    for node in graph.node_indices() {
        let Some(&position) = positions.get(node.index()) else {
            continue;
        };
        for rect in shapes::label(graph[node], position, scale) {
            draw_filled_rect_mut(canvas, rect, LABEL_COLOR);
        }
    }
}
