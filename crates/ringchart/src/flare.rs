use crate::chart::ChartConfig;
use crate::error::RenderError;
use crate::geometry::{Point, Size};
use crate::raster::ChartImage;
use crate::render::FrameRenderer;
use cairo::{Context, Format, ImageSurface};

/// Something that can be placed in a larger scene and drawn at a moment of its animation.
pub trait Flare {
    /// Where the anchor point sits in the scene.
    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Anchor as a fraction of the size, (0, 0) being the top left corner.
    fn anchor_point(&self) -> Point;

    fn size(&self) -> Size;

    /// Draws with the flare's top left corner at the current user-space origin.
    fn draw_at_time(&self, cr: &Context, time: f64) -> Result<(), cairo::Error>;

    /// Top left corner in scene coordinates.
    fn origin(&self) -> Point {
        let (position, anchor, size) = (self.position(), self.anchor_point(), self.size());
        Point::new(
            position.x - anchor.x * size.width,
            position.y - anchor.y * size.height,
        )
    }
}

/// A chart anchored at its own center.
pub struct ChartFlare {
    renderer: FrameRenderer,
    position: Point,
}

impl ChartFlare {
    pub fn new(config: ChartConfig, position: Point) -> Result<Self, RenderError> {
        Ok(Self {
            renderer: FrameRenderer::new(config)?,
            position,
        })
    }
}

impl Flare for ChartFlare {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn anchor_point(&self) -> Point {
        let layout = self.renderer.layout();
        Point::new(
            layout.center.x / layout.size.width,
            layout.center.y / layout.size.height,
        )
    }

    fn size(&self) -> Size {
        self.renderer.size()
    }

    fn draw_at_time(&self, cr: &Context, time: f64) -> Result<(), cairo::Error> {
        self.renderer.draw(cr, time)
    }
}

/// Composes several flares into one canvas.
pub struct FlareView {
    size: Size,
    scale: f64,
    flares: Vec<Box<dyn Flare>>,
}

impl FlareView {
    pub fn new(size: Size, scale: f64) -> Self {
        Self {
            size,
            scale,
            flares: Vec::new(),
        }
    }

    pub fn add(&mut self, flare: impl Flare + 'static) {
        self.flares.push(Box::new(flare));
    }

    pub fn flares_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Flare>> {
        self.flares.iter_mut()
    }

    /// Draws every flare in insertion order.
    pub fn draw(&self, cr: &Context, time: f64) -> Result<(), cairo::Error> {
        for flare in &self.flares {
            let origin = flare.origin();
            cr.save()?;
            cr.translate(origin.x, origin.y);
            flare.draw_at_time(cr, time)?;
            cr.restore()?;
        }
        Ok(())
    }

    pub fn render(&self, time: f64) -> Result<ChartImage, RenderError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(RenderError::InvalidScale(self.scale));
        }
        let width = (self.size.width * self.scale).ceil() as i32;
        let height = (self.size.height * self.scale).ceil() as i32;
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let cr = Context::new(&surface)?;
            cr.scale(self.scale, self.scale);
            self.draw(&cr, time)?;
        }
        ChartImage::from_surface(&surface)
    }
}
