use glam::Vec2;
use imageproc::rect::Rect;

/// Digits 0-9 as 3x5 bitmaps, one row per entry, most significant bit on the left
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b011, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

/// Pixel size of `label` drawn with `scale`
pub fn label_size(label: u32, scale: u32) -> (u32, u32) {
    let digits = label.to_string().len() as u32;
    let width = digits * GLYPH_WIDTH * scale + digits.saturating_sub(1) * scale;
    (width, GLYPH_HEIGHT * scale)
}

/// Rectangles spelling `label`, centered on `center`
pub fn label(label: u32, center: Vec2, scale: u32) -> Vec<Rect> {
    let scale = scale.max(1);
    let (width, height) = label_size(label, scale);
    let left = center.x.round() as i32 - (width / 2) as i32;
    let top = center.y.round() as i32 - (height / 2) as i32;

    let mut rects = vec![];
    for (i, digit) in label.to_string().bytes().enumerate() {
        let Some(rows) = DIGITS.get((digit - b'0') as usize) else {
            continue;
        };
        let glyph_left = left + (i as u32 * (GLYPH_WIDTH + 1) * scale) as i32;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                rects.push(
                    Rect::at(
                        glyph_left + (col * scale) as i32,
                        top + (row as u32 * scale) as i32,
                    )
                    .of_size(scale, scale),
                );
            }
        }
    }
    rects
}

/// Both strokes of an arrowhead whose tip touches the circle of radius `radius` around `to`
pub fn arrow_head(from: Vec2, to: Vec2, radius: f32, size: f32) -> Option<[(Vec2, Vec2); 2]> {
    let direction = (to - from).try_normalize()?;
    let tip = to - direction * radius;
    let back = tip - direction * size;
    let side = direction.perp() * size * 0.5;

    Some([(tip, back + side), (tip, back - side)])
}

/// Segment from the border of the source circle to the border of the target circle
pub fn edge(from: Vec2, to: Vec2, radius: f32) -> Option<(Vec2, Vec2)> {
    let direction = (to - from).try_normalize()?;
    if from.distance(to) <= 2.0 * radius {
        return None;
    }
    Some((from + direction * radius, to - direction * radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_sizes() {
        assert_eq!(label_size(7, 2), (6, 10));
        assert_eq!(label_size(42, 2), (14, 10));
        assert_eq!(label_size(100, 1), (11, 5));
    }

    #[test]
    fn one_rect_per_lit_pixel() {
        assert_eq!(label(1, Vec2::new(50.0, 50.0), 1).len(), 8);
        assert_eq!(label(8, Vec2::new(50.0, 50.0), 3).len(), 13);
        assert_eq!(label(11, Vec2::ZERO, 1).len(), 16);
    }

    #[test]
    fn label_is_centered() {
        let rects = label(0, Vec2::new(10.0, 10.0), 1);
        let left = rects.iter().map(|r| r.left()).min().unwrap();
        let top = rects.iter().map(|r| r.top()).min().unwrap();
        assert_eq!((left, top), (9, 8));
    }

    #[test]
    fn arrow_head_points_at_target() {
        let [(tip, a), (_, b)] =
            arrow_head(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, 4.0).unwrap();
        assert_eq!(tip, Vec2::new(8.0, 0.0));
        assert_eq!(a.x, 4.0);
        assert_eq!(a.y, -b.y);
        assert!(arrow_head(Vec2::ONE, Vec2::ONE, 2.0, 4.0).is_none());
    }

    #[test]
    fn overlapping_nodes_have_no_edge() {
        assert!(edge(Vec2::ZERO, Vec2::new(3.0, 0.0), 2.0).is_none());
        let (a, b) = edge(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0).unwrap();
        assert_eq!((a, b), (Vec2::new(2.0, 0.0), Vec2::new(8.0, 0.0)));
    }
}
