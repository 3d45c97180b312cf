//! The demo scene: a toon shaded sphere with an inverted-hull outline standing
//! on a checkered floor, lit by up to three orbiting directional lights.
//!
//! Every tunable lives in [`SceneConfig`] and the scene's [`ShadingParams`];
//! the GUI panel edits both in place and the changes are uploaded on the next
//! update.

use anyhow::Context as _;
use cgmath::{Deg, Matrix3, Vector3};
use instant::Duration;
use wgpu::util::DeviceExt;

use crate::{
    camera::Camera,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        model::Mesh,
        primitives::Geometry,
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    pipelines::{
        light::{LightRaw, LightUniform},
        outline::OutlineMaterial,
        standard::{StandardMaterial, StandardUniform},
        toon::ToonMaterial,
    },
    render::{Render, Shaded},
    resources,
    shading::{
        DirectionalLight, ShadingParams, ToonStyle, color,
        params::{AMBIENT_RANGE, BANDING_RANGE, DIFFUSE_RANGE, GLOSSINESS_RANGE, RIM_AMOUNT_RANGE, SPECULAR_RANGE},
    },
};

pub const LINE_WEIGHT_RANGE: std::ops::RangeInclusive<f32> = 1.0..=2.0;
pub const LIGHT_SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.0..=5.0;
/// Degrees per second the lights orbit at a speed of 1.
pub const ORBIT_DEGREES_PER_SECOND: f32 = 2.0;

/// One of the scene's directional lights.
///
/// `position` is where the light sits before orbiting. The light shines from
/// there towards the origin, so it doubles as the light direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLight {
    pub enabled: bool,
    pub position: Vector3<f32>,
    /// `0xRRGGBB`, sRGB.
    pub color: u32,
    pub intensity: f32,
}

impl SceneLight {
    pub fn descriptor(&self, position: Vector3<f32>) -> DirectionalLight {
        DirectionalLight::new(position, color::hex_to_linear(self.color), self.intensity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Scale of the outline hull relative to the sphere.
    pub line_weight: f32,
    pub light_speed: f32,
    pub lights: [SceneLight; 3],
    pub show_light_helpers: bool,
    pub shading: ShadingParams,
    pub sphere_radius: f32,
    pub sphere_segments: u32,
    pub outline_color: u32,
    pub floor_size: f32,
    pub floor_color: u32,
    pub floor_ambient: u32,
    pub floor_texture: String,
    /// How often the floor texture repeats along each axis.
    pub floor_repeat: f32,
    pub background: u32,
    pub camera_position: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            line_weight: 1.02,
            light_speed: 1.0,
            lights: [
                SceneLight {
                    enabled: true,
                    position: Vector3::new(5.0, 5.0, 5.0),
                    color: 0xFFFFFF,
                    intensity: 0.5,
                },
                SceneLight {
                    enabled: true,
                    position: Vector3::new(-6.0, 4.0, -2.0),
                    color: 0xFFB070,
                    intensity: 0.25,
                },
                SceneLight {
                    enabled: true,
                    position: Vector3::new(0.0, 6.0, -6.0),
                    color: 0x70A0FF,
                    intensity: 0.25,
                },
            ],
            show_light_helpers: true,
            shading: ShadingParams::default(),
            sphere_radius: 2.0,
            sphere_segments: 24,
            outline_color: 0x000000,
            floor_size: 200.0,
            floor_color: 0x808080,
            floor_ambient: 0x888888,
            floor_texture: "checker_tile.png".to_string(),
            floor_repeat: 40.0,
            background: 0x000000,
            camera_position: [0.0, 5.0, 15.0],
        }
    }
}

/// Sphere and outline hull instances for a sphere resting on the floor.
///
/// The hull is the sphere scaled by `line_weight`; both are lifted so the hull
/// touches the ground plane.
pub fn sphere_placement(radius: f32, line_weight: f32) -> (Instance, Instance) {
    let position = Vector3::new(0.0, radius * line_weight, 0.0);
    let sphere = Instance::from(position);
    let hull = Instance::from(position).with_uniform_scale(line_weight);
    (sphere, hull)
}

/// Rotate `position` about the Y axis by `angle`.
pub fn orbit_light(position: Vector3<f32>, angle: Deg<f32>) -> Vector3<f32> {
    Matrix3::from_angle_y(angle) * position
}

/// Advance an orbit angle in degrees, wrapped to `[0, 360)`.
pub fn advance_orbit(angle: f32, speed: f32, dt: Duration) -> f32 {
    (angle + ORBIT_DEGREES_PER_SECOND * speed * dt.as_secs_f32()).rem_euclid(360.0)
}

/// Pack the enabled lights, orbited by `angle`, into the light uniform.
pub fn pack_lights(lights: &[SceneLight], angle: Deg<f32>) -> LightUniform {
    LightUniform::new(lights.iter().filter(|light| light.enabled).map(|light| {
        let position = orbit_light(light.position, angle);
        LightRaw::new(&light.descriptor(position), position)
    }))
}

fn mk_instance_buffer(device: &wgpu::Device, label: &str, instance: &Instance) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[instance.to_raw()]),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

pub struct ToonScene {
    pub config: SceneConfig,
    pub params: ShadingParams,
    orbit_angle: f32,
    applied_line_weight: f32,
    params_changed: bool,
    floor: Mesh,
    floor_instance: wgpu::Buffer,
    floor_material: StandardMaterial,
    sphere: Mesh,
    sphere_instance: wgpu::Buffer,
    hull_instance: wgpu::Buffer,
    toon_material: ToonMaterial,
    outline_material: OutlineMaterial,
}

impl ToonScene {
    pub async fn new(init: InitContext, config: SceneConfig) -> anyhow::Result<Self> {
        let device = &init.device;
        let params = config.shading.clamped();

        let texture = resources::load_texture(&config.floor_texture, device, &init.queue)
            .await
            .with_context(|| format!("failed to load the floor texture `{}`", config.floor_texture))?;
        let floor_material = StandardMaterial::new(
            device,
            &init.layouts.standard,
            StandardUniform::new(
                color::hex_to_linear(config.floor_color),
                color::hex_to_linear(config.floor_ambient),
                [config.floor_repeat, config.floor_repeat],
            ),
            texture,
        );
        let floor = Mesh::new(
            device,
            "floor",
            &Geometry::cuboid(config.floor_size, 0.1, config.floor_size),
        );
        let floor_instance = mk_instance_buffer(device, "Floor Instance Buffer", &Instance::new());

        let segments = config.sphere_segments;
        let sphere = Mesh::new(
            device,
            "sphere",
            &Geometry::sphere(config.sphere_radius, segments, segments),
        );
        let (sphere_placed, hull_placed) = sphere_placement(config.sphere_radius, config.line_weight);
        let sphere_instance = mk_instance_buffer(device, "Sphere Instance Buffer", &sphere_placed);
        let hull_instance = mk_instance_buffer(device, "Outline Instance Buffer", &hull_placed);

        let toon_material = ToonMaterial::new(device, &init.layouts.toon, &params);
        let outline_material = OutlineMaterial::new(
            device,
            &init.layouts.outline,
            color::hex_to_linear(config.outline_color),
        );

        log::info!(
            "toon scene ready: sphere with {} indices, floor {}x{}",
            sphere.num_elements,
            config.floor_size,
            config.floor_size
        );

        Ok(Self {
            applied_line_weight: config.line_weight,
            config,
            params,
            orbit_angle: 0.0,
            params_changed: false,
            floor,
            floor_instance,
            floor_material,
            sphere,
            sphere_instance,
            hull_instance,
            toon_material,
            outline_material,
        })
    }

    pub fn lights(&self) -> LightUniform {
        pack_lights(&self.config.lights, Deg(self.orbit_angle))
    }

    fn place_sphere(&mut self, queue: &wgpu::Queue) {
        let (sphere, hull) = sphere_placement(self.config.sphere_radius, self.config.line_weight);
        queue.write_buffer(&self.sphere_instance, 0, bytemuck::cast_slice(&[sphere.to_raw()]));
        queue.write_buffer(&self.hull_instance, 0, bytemuck::cast_slice(&[hull.to_raw()]));
        self.applied_line_weight = self.config.line_weight;
    }

    fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b] = color::hex_to_linear(self.config.background);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    fn material_panel(&mut self, ui: &mut egui::Ui) {
        let p = &mut self.params;
        ui.add(egui::Slider::new(&mut self.config.line_weight, LINE_WEIGHT_RANGE).step_by(0.01).text("Border"));
        ui.add(egui::Slider::new(&mut p.glossiness, GLOSSINESS_RANGE).step_by(1.0).text("Glossiness"));
        ui.add(egui::Slider::new(&mut p.rim_amount, RIM_AMOUNT_RANGE).step_by(0.05).text("Rim amount"));
        ui.add(egui::Slider::new(&mut p.ambient, AMBIENT_RANGE).text("Ambient"));
        ui.add(egui::Slider::new(&mut p.diffuse, DIFFUSE_RANGE).text("Diffuse"));
        ui.add(egui::Slider::new(&mut p.specular, SPECULAR_RANGE).text("Specular"));
        ui.add(egui::Slider::new(&mut p.banding, BANDING_RANGE).step_by(1.0).text("Banding"));

        ui.horizontal(|ui| {
            let mut srgb = color::linear_to_srgb8(p.color);
            if ui.color_edit_button_srgb(&mut srgb).changed() {
                p.color = color::srgb8_to_linear(srgb);
            }
            ui.label("Color");
        });

        let mut alternate = p.style == ToonStyle::Alternate;
        if ui.checkbox(&mut alternate, "Alternate style").changed() {
            p.style = if alternate { ToonStyle::Alternate } else { ToonStyle::Classic };
        }
        ui.checkbox(&mut p.flat_shading, "Flat shading");
        p.clamp_to_ranges();
    }

    fn light_panel(&mut self, ui: &mut egui::Ui) {
        for (i, light) in self.config.lights.iter_mut().enumerate() {
            ui.checkbox(&mut light.enabled, format!("Light {}", i + 1));
        }
        ui.add(egui::Slider::new(&mut self.config.light_speed, LIGHT_SPEED_RANGE).text("Speed"));
        ui.checkbox(&mut self.config.show_light_helpers, "Light helpers");
    }
}

impl<S> GraphicsFlow<S> for ToonScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) -> Out {
        ctx.clear_colour = self.clear_colour();
        ctx.camera.camera = Camera::new(self.config.camera_position, (0.0, 0.0, 0.0));
        ctx.light.write(&ctx.queue, self.lights());
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut S, dt: Duration) -> Out {
        self.orbit_angle = advance_orbit(self.orbit_angle, self.config.light_speed, dt);

        if self.applied_line_weight != self.config.line_weight {
            self.place_sphere(&ctx.queue);
        }
        if self.toon_material.write(&ctx.queue, &self.params) {
            self.params_changed = true;
        }

        let lights = self.lights();
        Out::Configure(Box::new(move |ctx: &mut Context| ctx.light.write(&ctx.queue, lights)))
    }

    fn on_tick(&mut self, _: &Context, _: &mut S) -> Out {
        if std::mem::take(&mut self.params_changed) {
            log::info!("shading parameters changed: {:?}", self.params);
        }
        Out::Empty
    }

    fn on_gui(&mut self, gui: &egui::Context, _: &mut S) -> Out {
        let mut out = Out::Empty;
        egui::Window::new("Toon")
            .default_pos(egui::pos2(10.0, 70.0))
            .resizable(false)
            .show(gui, |ui| {
                egui::CollapsingHeader::new("Material")
                    .default_open(true)
                    .show(ui, |ui| self.material_panel(ui));
                egui::CollapsingHeader::new("Lights")
                    .default_open(true)
                    .show(ui, |ui| self.light_panel(ui));
                ui.horizontal(|ui| {
                    let mut srgb = color::linear_to_srgb8(color::hex_to_linear(self.config.background));
                    if ui.color_edit_button_srgb(&mut srgb).changed() {
                        let [r, g, b] = srgb;
                        self.config.background = u32::from_be_bytes([0, r, g, b]);
                        let clear_colour = self.clear_colour();
                        out = Out::Configure(Box::new(move |ctx: &mut Context| ctx.clear_colour = clear_colour));
                    }
                    ui.label("Background");
                });
            });
        out
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        let mut renders = vec![
            Render::Standard(Shaded {
                mesh: &self.floor,
                instance: &self.floor_instance,
                amount: 1,
                material: &self.floor_material.bind_group,
            }),
            Render::Toon(Shaded {
                mesh: &self.sphere,
                instance: &self.sphere_instance,
                amount: 1,
                material: &self.toon_material.bind_group,
            }),
            Render::Outline(Shaded {
                mesh: &self.sphere,
                instance: &self.hull_instance,
                amount: 1,
                material: &self.outline_material.bind_group,
            }),
        ];
        if self.config.show_light_helpers {
            renders.push(Render::Custom(Box::new(|ctx: &Context, render_pass: &mut wgpu::RenderPass<'pass>| {
                render_pass.set_pipeline(&ctx.pipelines.light);
                render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
                render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
                ctx.light.draw_helpers(render_pass);
            })));
        }
        Render::Composed(renders)
    }
}

/// Constructor for the scene, ready to hand to [`flow::run`](crate::flow::run).
pub fn constructor<S: 'static>(config: SceneConfig) -> FlowConstructor<S> {
    Box::new(move |init| {
        Box::pin(async move {
            let scene = ToonScene::new(init, config).await?;
            Ok(Box::new(scene) as Box<dyn GraphicsFlow<S>>)
        })
    })
}

/// Open a window and run the scene with `config` until it is closed.
pub fn run_with(config: SceneConfig) -> anyhow::Result<()> {
    crate::flow::run::<()>(vec![constructor(config)])
}

pub fn run() -> anyhow::Result<()> {
    run_with(SceneConfig::default())
}

