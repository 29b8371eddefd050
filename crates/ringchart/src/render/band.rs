use super::timing::{FrameClock, band_color, sweep_angle};
use crate::band::Band;
use crate::color::Color;
use crate::geometry::{BandGeometry, Point, Rect, TextPlacement, to_device_angle};
use crate::text::{self, FontSpec};
use cairo::{Context, ImageSurface, Mesh, MeshCorner};
use std::f64::consts::TAU;

/// Upper bound for the angle covered by one gradient patch; patches have straight edges.
const MAX_PATCH_ANGLE: f64 = TAU / 360.0;
/// How far gradient patches reach past the band edges so antialiased pixels get color.
const PATCH_BLEED: f64 = 2.0;

pub(super) struct BandRenderer<'a> {
    band: &'a Band,
    geometry: &'a BandGeometry,
    center: Point,
    clock: FrameClock,
}

impl<'a> BandRenderer<'a> {
    pub(super) fn new(
        band: &'a Band,
        geometry: &'a BandGeometry,
        center: Point,
        clock: FrameClock,
    ) -> Self {
        Self {
            band,
            geometry,
            center,
            clock,
        }
    }

    /// Full ring underneath the arc.
    pub(super) fn draw_track(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Some(color) = self.band.background_color else {
            return Ok(());
        };
        if self.geometry.is_degenerate() {
            return Ok(());
        }
        let (r, g, b, a) = color.components();
        cr.new_path();
        cr.set_source_rgba(r, g, b, a);
        cr.set_line_width(self.geometry.width());
        cr.arc(
            self.center.x,
            self.center.y,
            self.geometry.mid_radius(),
            0.0,
            TAU,
        );
        cr.stroke()
    }

    /// The swept part of the band: a butt-ended stroke painted with a gradient mesh that
    /// follows the arc, between two round caps in the colors of its ends. The end cap goes
    /// last so a full ring visibly overlaps its own start.
    pub(super) fn draw_arc(&self, cr: &Context) -> Result<(), cairo::Error> {
        let target = sweep_angle(self.band.value, 1.0);
        let sweep = sweep_angle(self.band.value, self.clock.progress());
        if sweep.is_nan() || sweep <= 0.0 || self.geometry.is_degenerate() {
            return Ok(());
        }

        cr.save()?;
        self.draw_cap(cr, 0.0, self.band.start_color)?;

        cr.new_path();
        cr.arc(
            self.center.x,
            self.center.y,
            self.geometry.mid_radius(),
            to_device_angle(0.0),
            to_device_angle(sweep),
        );
        cr.set_line_width(self.geometry.width());
        cr.set_line_cap(cairo::LineCap::Butt);
        cr.set_source(&self.gradient(sweep, target))?;
        cr.stroke()?;

        self.draw_cap(cr, sweep, self.color_at(sweep, target))?;
        cr.restore()
    }

    fn draw_cap(&self, cr: &Context, angle: f64, color: Color) -> Result<(), cairo::Error> {
        let at = Point::polar(self.center, self.geometry.mid_radius(), angle);
        let (r, g, b, a) = color.components();
        cr.new_path();
        cr.set_source_rgba(r, g, b, a);
        cr.arc(at.x, at.y, self.geometry.width() / 2.0, 0.0, TAU);
        cr.fill()
    }

    fn color_at(&self, angle: f64, target: f64) -> Color {
        band_color(self.band.start_color, self.band.end_color, angle / target)
    }

    fn gradient(&self, sweep: f64, target: f64) -> Mesh {
        let mesh = Mesh::new();
        let start = self.band.start_color;
        // split at the half so the flat part and the blend meet on a patch edge
        let half = target / 2.0;
        self.add_patches(&mesh, 0.0, sweep.min(half), |_| start);
        if sweep > half {
            self.add_patches(&mesh, half, sweep, |angle| self.color_at(angle, target));
        }
        mesh
    }

    fn add_patches(&self, mesh: &Mesh, from: f64, to: f64, color_at: impl Fn(f64) -> Color) {
        let span = to - from;
        if span <= 0.0 {
            return;
        }
        let inner = (self.geometry.inner_radius - PATCH_BLEED).max(0.0);
        let outer = self.geometry.outer_radius + PATCH_BLEED;
        let steps = (span / MAX_PATCH_ANGLE).ceil().max(1.0) as usize;

        for step in 0..steps {
            let a0 = from + span * step as f64 / steps as f64;
            let a1 = from + span * (step + 1) as f64 / steps as f64;
            let corners = [
                (Point::polar(self.center, inner, a0), color_at(a0)),
                (Point::polar(self.center, outer, a0), color_at(a0)),
                (Point::polar(self.center, outer, a1), color_at(a1)),
                (Point::polar(self.center, inner, a1), color_at(a1)),
            ];

            mesh.begin_patch();
            mesh.move_to(corners[0].0.x, corners[0].0.y);
            for (point, _) in &corners[1..] {
                mesh.line_to(point.x, point.y);
            }
            let indices = [
                MeshCorner::MeshCorner0,
                MeshCorner::MeshCorner1,
                MeshCorner::MeshCorner2,
                MeshCorner::MeshCorner3,
            ];
            for (corner, (_, color)) in indices.into_iter().zip(corners) {
                let (r, g, b, a) = color.components();
                mesh.set_corner_color_rgba(corner, r, g, b, a);
            }
            mesh.end_patch();
        }
    }

    pub(super) fn draw_icon(
        &self,
        cr: &Context,
        surface: &ImageSurface,
        rect: &Rect,
        scale: f64,
    ) -> Result<(), cairo::Error> {
        let alpha = self.clock.icon_alpha();
        if alpha <= 0.0 {
            return Ok(());
        }
        cr.save()?;
        cr.translate(rect.min.x, rect.min.y);
        cr.scale(1.0 / scale, 1.0 / scale);
        cr.set_source_surface(surface, 0.0, 0.0)?;
        cr.paint_with_alpha(alpha)?;
        cr.restore()
    }

    pub(super) fn draw_caption(
        &self,
        cr: &Context,
        placement: &TextPlacement,
        font: &FontSpec,
        auto_hide: bool,
    ) -> Result<(), cairo::Error> {
        let (Some(caption), alpha) = (
            self.band.visible_caption(),
            self.clock.caption_alpha(auto_hide),
        ) else {
            return Ok(());
        };
        if alpha <= 0.0 {
            return Ok(());
        }
        cr.move_to(placement.origin.x, placement.origin.y);
        text::draw_text(cr, caption, font, self.band.caption_color().faded(alpha))
    }
}
