use super::*;
use crate::pipeline::YAxisDirection;
use vek::*;

/// Vertices with a `w` at or below this are behind the eye and get clipped away.
const W_CLIP: f32 = 1.0e-5;

/// A rasterizer that produces filled triangles.
#[derive(Copy, Clone, Debug, Default)]
pub struct Triangles;

impl Rasterizer for Triangles {
    type Config = CullMode;

    #[inline]
    unsafe fn rasterize<V, I, B>(
        &self,
        mut vertices: I,
        coords: CoordinateMode,
        cull_mode: CullMode,
        mut blitter: B,
    ) where
        V: Clone + WeightedSum,
        I: Iterator<Item = ([f32; 4], V)>,
        B: Blitter<V>,
    {
        let flip = match coords.y_axis_direction {
            YAxisDirection::Down => 1.0,
            YAxisDirection::Up => -1.0,
        };

        let mut clipped = Vec::with_capacity(4);
        while let (Some(a), Some(b), Some(c)) = (vertices.next(), vertices.next(), vertices.next()) {
            let tri = [a, b, c].map(|(pos, v)| (Vec4::from(pos) * Vec4::new(1.0, flip, 1.0, 1.0), v));

            if tri.iter().all(|(pos, _)| pos.w > W_CLIP) {
                let [a, b, c] = tri;
                rasterize_tri(a, b, c, &coords, cull_mode, &mut blitter);
            } else {
                // Part of the triangle is behind the eye: clip it against the w = W_CLIP plane and fan out whatever
                // polygon is left.
                clip_behind_eye(tri, &mut clipped);
                for i in 1..clipped.len().saturating_sub(1) {
                    rasterize_tri(
                        clipped[0].clone(),
                        clipped[i].clone(),
                        clipped[i + 1].clone(),
                        &coords,
                        cull_mode,
                        &mut blitter,
                    );
                }
            }
        }
    }
}

/// Sutherland-Hodgman against a single plane, producing at most four vertices.
fn clip_behind_eye<V: Clone + WeightedSum>(tri: [(Vec4<f32>, V); 3], out: &mut Vec<(Vec4<f32>, V)>) {
    out.clear();
    for i in 0..3 {
        let (cur_pos, cur_v) = &tri[i];
        let (next_pos, next_v) = &tri[(i + 1) % 3];
        let cur_in = cur_pos.w > W_CLIP;
        let next_in = next_pos.w > W_CLIP;

        if cur_in {
            out.push((*cur_pos, cur_v.clone()));
        }
        if cur_in != next_in {
            let t = (W_CLIP - cur_pos.w) / (next_pos.w - cur_pos.w);
            let pos = *cur_pos + (*next_pos - *cur_pos) * t;
            let v = V::weighted_sum2(cur_v.clone(), next_v.clone(), 1.0 - t, t);
            out.push((pos, v));
        }
    }
}

#[inline(always)]
fn edge(a: Vec2<f32>, b: Vec2<f32>, p: Vec2<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[inline]
unsafe fn rasterize_tri<V, B>(
    (a_hom, a_v): (Vec4<f32>, V),
    (b_hom, b_v): (Vec4<f32>, V),
    (c_hom, c_v): (Vec4<f32>, V),
    coords: &CoordinateMode,
    cull_mode: CullMode,
    blitter: &mut B,
) where
    V: Clone + WeightedSum,
    B: Blitter<V>,
{
    let size = Vec2::<usize>::from(blitter.target_size()).map(|e| e as f32);
    let tgt_min = Vec2::<usize>::from(blitter.target_min());
    let tgt_max = Vec2::<usize>::from(blitter.target_max());

    // Convert homogenous to euclidean coordinates
    let rcp_w = Vec3::new(a_hom.w, b_hom.w, c_hom.w).map(|w| 1.0 / w);
    let a_euc = a_hom.xyz() * rcp_w.x;
    let b_euc = b_hom.xyz() * rcp_w.y;
    let c_euc = c_hom.xyz() * rcp_w.z;

    // Convert vertex coordinates to screen space (+y pointing down)
    let to_screen = |euc: Vec3<f32>| size * (euc.xy() * 0.5 + 0.5);
    let (a, b, c) = (to_screen(a_euc), to_screen(b_euc), to_screen(c_euc));

    // Twice the signed area. With +y down, a triangle that looks counter-clockwise on screen has negative area.
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    let front_facing = area < 0.0;
    match cull_mode {
        CullMode::Back if !front_facing => return,
        CullMode::Front if front_facing => return,
        _ => {}
    }
    let rcp_area = 1.0 / area;

    // Calculate the triangle bounds as a bounding box, clamped to the region we own
    let min = Vec2::partial_min(Vec2::partial_min(a, b), c).map(|e: f32| e.floor().max(0.0));
    let max = Vec2::partial_max(Vec2::partial_max(a, b), c).map(|e: f32| (e.ceil() + 1.0).max(0.0));
    let min = Vec2::<usize>::new(min.x as usize, min.y as usize).map2(tgt_min, |e, lo| e.max(lo));
    let max = Vec2::<usize>::new(max.x as usize, max.y as usize).map2(tgt_max, |e, hi| e.min(hi));
    if min.x >= max.x || min.y >= max.y {
        return;
    }

    blitter.begin_primitive();

    let weights_at = |x: f32, y: f32| {
        let p = Vec2::new(x + 0.5, y + 0.5);
        Vec3::new(edge(b, c, p), edge(c, a, p), edge(a, b, p)) * rcp_area
    };

    let mut shade = |x: usize, y: usize| {
        let w = weights_at(x as f32, y as f32);
        if w.x < 0.0 || w.y < 0.0 || w.z < 0.0 {
            return;
        }

        // NDC depth varies linearly in screen space
        let z = a_euc.z * w.x + b_euc.z * w.y + c_euc.z * w.z;
        if !coords.passes_z_clip(z) || !blitter.test_fragment(x, y, z) {
            return;
        }

        let get_v_data = |x: f32, y: f32| {
            // Perspective-correct weights
            let w = weights_at(x, y) * rcp_w;
            let w = w / (w.x + w.y + w.z);
            V::weighted_sum3(a_v.clone(), b_v.clone(), c_v.clone(), w.x, w.y, w.z)
        };
        blitter.emit_fragment(x, y, get_v_data, z);
    };

    // Rows are contiguous in every target, so walk along x
    for y in min.y..max.y {
        for x in min.x..max.x {
            shade(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipping_keeps_the_visible_part() {
        let tri = [
            (Vec4::new(0.0, 0.0, 0.0, 1.0), 1.0f32),
            (Vec4::new(1.0, 0.0, 0.0, 1.0), 1.0),
            (Vec4::new(0.0, 1.0, 0.0, -1.0), 0.0),
        ];
        let mut out = Vec::new();
        clip_behind_eye(tri, &mut out);
        // Two vertices in front, one behind: a quad
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|(pos, _)| pos.w >= W_CLIP * 0.999));
    }

    #[test]
    fn fully_hidden_triangles_vanish() {
        let tri = [
            (Vec4::new(0.0, 0.0, 0.0, -1.0), 1.0f32),
            (Vec4::new(1.0, 0.0, 0.0, -2.0), 1.0),
            (Vec4::new(0.0, 1.0, 0.0, -1.0), 0.0),
        ];
        let mut out = Vec::new();
        clip_behind_eye(tri, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn edge_function_sign() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        assert!(edge(a, b, Vec2::new(0.0, 1.0)) > 0.0);
        assert!(edge(a, b, Vec2::new(0.0, -1.0)) < 0.0);
    }
}
