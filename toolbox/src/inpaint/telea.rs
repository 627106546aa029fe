//! Telea's fast-marching inpainting.
//!
//! Masked pixels are filled in order of their distance to the mask boundary.
//! Each pixel becomes a weighted average of first-order estimates from the
//! already-known pixels inside a disc of the configured radius, favouring
//! neighbours that are close, lie on the same distance level and sit along
//! the normal of the advancing front.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use image::{GrayImage, Rgb, RgbImage};

use crate::error::{Result, ToolboxError};

const INF: f32 = 1.0e6;
/// Floor for the direction factor so tangential neighbours still count.
const MIN_DIRECTION: f32 = 1.0e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Known,
    Band,
    Inside,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    dist: f32,
    index: usize,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    // Reversed so that `BinaryHeap` pops the smallest distance first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Distance map plus per-pixel marching state.
struct Field {
    width: usize,
    height: usize,
    flags: Vec<Flag>,
    dist: Vec<f32>,
}

impl Field {
    fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    fn offset(&self, index: usize, dx: isize, dy: isize) -> Option<usize> {
        let (x, y) = self.coords(index);
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some(ny * self.width + nx)
    }

    fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        [(0, -1), (-1, 0), (1, 0), (0, 1)]
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(index, dx, dy))
    }

    fn is_settled(&self, index: Option<usize>) -> bool {
        index.is_some_and(|i| self.flags[i] != Flag::Inside)
    }

    fn value(&self, index: Option<usize>) -> f32 {
        index.map_or(INF, |i| self.dist[i])
    }

    /// First-order upwind solution of |∇T| = 1 from two orthogonal neighbours.
    fn solve(&self, a: Option<usize>, b: Option<usize>) -> f32 {
        let (ta, tb) = (self.value(a), self.value(b));
        match (self.is_settled(a), self.is_settled(b)) {
            (true, true) => {
                let diff = ta - tb;
                if diff.abs() >= 1.0 {
                    1.0 + ta.min(tb)
                } else {
                    (ta + tb + (2.0 - diff * diff).sqrt()) * 0.5
                }
            }
            (true, false) => 1.0 + ta,
            (false, true) => 1.0 + tb,
            (false, false) => 1.0 + ta.min(tb),
        }
    }

    fn arrival_time(&self, index: usize) -> f32 {
        let up = self.offset(index, 0, -1);
        let down = self.offset(index, 0, 1);
        let left = self.offset(index, -1, 0);
        let right = self.offset(index, 1, 0);

        self.solve(up, left)
            .min(self.solve(down, right))
            .min(self.solve(up, right))
            .min(self.solve(down, left))
    }

    fn axis_gradient(&self, index: usize, prev: Option<usize>, next: Option<usize>) -> f32 {
        match (self.is_settled(prev), self.is_settled(next)) {
            (true, true) => (self.value(next) - self.value(prev)) * 0.5,
            (false, true) => self.value(next) - self.dist[index],
            (true, false) => self.dist[index] - self.value(prev),
            (false, false) => 0.0,
        }
    }

    /// Gradient of the distance map, i.e. the normal of the marching front.
    fn gradient(&self, index: usize) -> (f32, f32) {
        let gx = self.axis_gradient(
            index,
            self.offset(index, -1, 0),
            self.offset(index, 1, 0),
        );
        let gy = self.axis_gradient(
            index,
            self.offset(index, 0, -1),
            self.offset(index, 0, 1),
        );
        (gx, gy)
    }
}

/// Inpaint every pixel of `image` where `mask` is nonzero.
///
/// `mask` must have the same dimensions as `image`. An all-zero mask, or one
/// that covers the whole image and therefore leaves nothing to propagate
/// from, returns the image unchanged.
pub fn inpaint(image: &RgbImage, mask: &GrayImage, radius: u32) -> Result<RgbImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(ToolboxError::Inpainting(format!(
            "Mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        )));
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let radius = radius.max(1) as isize;

    let flags: Vec<Flag> = mask
        .pixels()
        .map(|p| if p[0] != 0 { Flag::Inside } else { Flag::Known })
        .collect();
    let dist = flags
        .iter()
        .map(|f| if *f == Flag::Inside { INF } else { 0.0 })
        .collect();
    let mut field = Field {
        width,
        height,
        flags,
        dist,
    };

    let band: Vec<usize> = (0..width * height)
        .filter(|&i| {
            field.flags[i] == Flag::Known
                && field.neighbors(i).any(|n| field.flags[n] == Flag::Inside)
        })
        .collect();

    let mut output = image.clone();
    if band.is_empty() {
        return Ok(output);
    }
    for &i in &band {
        field.flags[i] = Flag::Band;
    }

    compute_outside_distances(&mut field, &band, 2.0 * radius as f32);

    let mut heap: BinaryHeap<Node> = band
        .iter()
        .map(|&index| Node { dist: 0.0, index })
        .collect();

    while let Some(Node { index, .. }) = heap.pop() {
        field.flags[index] = Flag::Known;

        let frontier: Vec<usize> = field
            .neighbors(index)
            .filter(|&n| field.flags[n] == Flag::Inside)
            .collect();

        for n in frontier {
            field.dist[n] = field.arrival_time(n);
            fill_pixel(&field, &mut output, n, radius);
            field.flags[n] = Flag::Band;
            heap.push(Node {
                dist: field.dist[n],
                index: n,
            });
        }
    }

    Ok(output)
}

/// March outward from the band into the known region, storing negative
/// distances so the level term compares pixels on both sides of the boundary.
fn compute_outside_distances(field: &mut Field, band: &[usize], limit: f32) {
    let mut outside = Field {
        width: field.width,
        height: field.height,
        flags: field
            .flags
            .iter()
            .map(|f| match f {
                Flag::Known => Flag::Inside,
                Flag::Band => Flag::Band,
                Flag::Inside => Flag::Known,
            })
            .collect(),
        // Masked pixels sit at INF so they act as a barrier rather than a source.
        dist: field
            .flags
            .iter()
            .map(|f| if *f == Flag::Band { 0.0 } else { INF })
            .collect(),
    };

    let mut heap: BinaryHeap<Node> = band
        .iter()
        .map(|&index| Node { dist: 0.0, index })
        .collect();

    while let Some(Node { dist, index }) = heap.pop() {
        if dist > limit {
            break;
        }
        outside.flags[index] = Flag::Known;

        let frontier: Vec<usize> = outside
            .neighbors(index)
            .filter(|&n| outside.flags[n] == Flag::Inside)
            .collect();

        for n in frontier {
            outside.dist[n] = outside.arrival_time(n);
            outside.flags[n] = Flag::Band;
            heap.push(Node {
                dist: outside.dist[n],
                index: n,
            });
        }
    }

    for i in 0..field.dist.len() {
        if field.flags[i] == Flag::Known {
            field.dist[i] = if outside.flags[i] == Flag::Inside {
                INF
            } else {
                -outside.dist[i]
            };
        }
    }
}

/// Central difference of the current colors along one axis, falling back to a
/// one-sided difference next to unfilled pixels or the image border.
fn color_difference(
    field: &Field,
    output: &RgbImage,
    index: usize,
    prev: Option<usize>,
    next: Option<usize>,
) -> [f32; 3] {
    let color = |i: usize| {
        let (x, y) = field.coords(i);
        output.get_pixel(x as u32, y as u32).0.map(f32::from)
    };

    match (field.is_settled(prev), field.is_settled(next), prev, next) {
        (true, true, Some(p), Some(n)) => {
            let (a, b) = (color(p), color(n));
            [0, 1, 2].map(|c| (b[c] - a[c]) * 0.5)
        }
        (false, true, _, Some(n)) => {
            let (a, b) = (color(index), color(n));
            [0, 1, 2].map(|c| b[c] - a[c])
        }
        (true, false, Some(p), _) => {
            let (a, b) = (color(p), color(index));
            [0, 1, 2].map(|c| b[c] - a[c])
        }
        _ => [0.0; 3],
    }
}

/// Estimate the color at `index` from the settled pixels within `radius`.
///
/// Each neighbour q contributes its color extrapolated to p with its own
/// color gradient, `I(q) + ∇I(q)·(p - q)`, weighted by the front direction,
/// `1/|p - q|³` and the distance-level similarity.
fn fill_pixel(field: &Field, output: &mut RgbImage, index: usize, radius: isize) {
    let (x, y) = field.coords(index);
    let (grad_x, grad_y) = field.gradient(index);
    let here = field.dist[index];

    let mut weight_sum = 0.0f32;
    let mut acc = [0.0f32; 3];

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let Some(n) = field.offset(index, dx, dy) else {
                continue;
            };
            if field.flags[n] == Flag::Inside {
                continue;
            }

            // Vector from the neighbour to the pixel being filled.
            let (rx, ry) = (-dx as f32, -dy as f32);
            let len2 = rx * rx + ry * ry;
            if len2 > (radius * radius) as f32 {
                continue;
            }

            let mut direction = rx * grad_x + ry * grad_y;
            if direction.abs() <= 0.01 {
                direction = MIN_DIRECTION;
            }
            let distance = 1.0 / (len2 * len2.sqrt());
            let level = 1.0 / (1.0 + (field.dist[n] - here).abs());
            let weight = (direction * distance * level).abs();

            let color_dx = color_difference(
                field,
                output,
                n,
                field.offset(n, -1, 0),
                field.offset(n, 1, 0),
            );
            let color_dy = color_difference(
                field,
                output,
                n,
                field.offset(n, 0, -1),
                field.offset(n, 0, 1),
            );

            let (nx, ny) = field.coords(n);
            let pixel = output.get_pixel(nx as u32, ny as u32);
            for c in 0..3 {
                let estimate = pixel[c] as f32 + color_dx[c] * rx + color_dy[c] * ry;
                acc[c] += weight * estimate;
            }
            weight_sum += weight;
        }
    }

    if weight_sum > 0.0 {
        let value = acc.map(|v| (v / weight_sum).round().clamp(0.0, 255.0) as u8);
        output.put_pixel(x as u32, y as u32, Rgb(value));
    }
}
