//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn with a [`Render`]. The engine walks every
//! flow's render tree, sorts the draw requests into one batch per pipeline and
//! then issues each batch with a single pipeline switch.

use wgpu::RenderPass;

use crate::{
    context::Context,
    data_structures::model::{DrawMesh, Mesh},
};

/// An instanced mesh together with the material bind group it is shaded with.
#[derive(Clone, Copy)]
pub struct Shaded<'a> {
    pub mesh: &'a Mesh,
    pub instance: &'a wgpu::Buffer,
    pub amount: usize,
    pub material: &'a wgpu::BindGroup,
}

/// Specifies how a flow's objects should be rendered.
///
/// - `None` renders nothing
/// - `Toon` renders with the toon material
/// - `Standard` renders with the textured standard material
/// - `Outline` renders an inverted hull
/// - `Composed` renders every contained render
/// - `Custom` runs a closure against the scene pass, e.g. for the light helpers
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Toon(Shaded<'a>),
    Standard(Shaded<'a>),
    Outline(Shaded<'a>),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>),
}

/// Draw requests collected from all flows, one list per pipeline.
#[derive(Default)]
pub struct Batches<'a> {
    pub toons: Vec<Shaded<'a>>,
    pub standards: Vec<Shaded<'a>>,
    pub outlines: Vec<Shaded<'a>>,
}

impl<'a> Batches<'a> {
    /// Issue every batch. Standard surfaces go first, then toon shaded meshes and
    /// finally their outlines.
    pub fn draw(self, ctx: &Context, render_pass: &mut RenderPass<'_>) {
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);

        render_pass.set_pipeline(&ctx.pipelines.standard);
        render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
        draw_all(render_pass, 2, &self.standards);

        render_pass.set_pipeline(&ctx.pipelines.toon);
        render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
        draw_all(render_pass, 2, &self.toons);

        render_pass.set_pipeline(&ctx.pipelines.outline);
        draw_all(render_pass, 1, &self.outlines);
    }
}

fn draw_all(render_pass: &mut RenderPass<'_>, material_group: u32, shaded: &[Shaded]) {
    for item in shaded {
        if item.amount == 0 || item.instance.size() == 0 {
            log::warn!("skipping `{}`: it has zero instances", item.mesh.name);
            continue;
        }
        render_pass.set_bind_group(material_group, item.material, &[]);
        render_pass.draw_mesh_instanced(item.mesh, item.instance, 0..item.amount as u32);
    }
}

impl<'a, 'pass> Render<'a, 'pass> {
    /// Sort `self` into `batches`. `Custom` closures run immediately.
    pub(crate) fn set_pipelines(self, ctx: &Context, render_pass: &mut RenderPass<'pass>, batches: &mut Batches<'a>) {
        match self {
            Render::Toon(shaded) => batches.toons.push(shaded),
            Render::Standard(shaded) => batches.standards.push(shaded),
            Render::Outline(shaded) => batches.outlines.push(shaded),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(ctx, render_pass, batches)),
            Render::Custom(f) => f(ctx, render_pass),
            Render::None => (),
        }
    }
}
