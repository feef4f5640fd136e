use app_core::constants::{
    fixed_light_vec3, BAR_COLOR, BAR_SIZE, BLOOM_RADIUS, BLOOM_THRESHOLD, LIGHT_INTENSITY,
    STAR_COLOR, STAR_SIZE, TONE_EXPOSURE,
};
use app_core::scene::{self as layout, StarInstance};
use app_core::{wrap_radians, OrbitCamera, PerspectiveCamera, RenderTarget};
use web_sys as web;

mod helpers;
mod post;
mod scene;
mod targets;

use post::{PostBindGroups, PostPass, PostUniforms};
use scene::{SceneResources, SceneUniforms};
use targets::{RenderTargets, HDR_FORMAT};

/// WebGPU renderer: starfield and bars into HDR, then bloom and tone mapping.
///
/// The parameter mapper writes bar scales, bloom strength, field of view and
/// starfield rotation through the [`RenderTarget`] impl below; the values are
/// consumed on the next [`GpuState::render`].
pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    scene: SceneResources,
    post: post::PostResources,
    bind_groups: PostBindGroups,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    camera: PerspectiveCamera,

    bar_scales: Vec<f32>,
    bloom_strength: f32,
    star_rotation: f32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        bar_count: usize,
        stars: &[StarInstance],
        initial_fov: f32,
        initial_bloom: f32,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits: older WebGPU implementations reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height);
        let scene = scene::create_scene_resources(&device, HDR_FORMAT, bar_count, stars);

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(app_core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, HDR_FORMAT, format);
        let bind_groups = post::rebuild_bind_groups(&device, &post, &linear_sampler, &targets);

        log::info!(
            "[gpu] surface {}x{} format={:?} bars={} stars={}",
            width,
            height,
            format,
            bar_count,
            stars.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            linear_sampler,
            scene,
            post,
            bind_groups,
            width,
            height,
            clear_color: wgpu::Color::BLACK,
            camera: PerspectiveCamera::new(initial_fov, width as f32 / height as f32),
            bar_scales: vec![1.0; bar_count],
            bloom_strength: initial_bloom,
            star_rotation: 0.0,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.camera.set_aspect(width as f32 / height as f32);

            self.targets.recreate(&self.device, width, height);
            self.bind_groups = post::rebuild_bind_groups(
                &self.device,
                &self.post,
                &self.linear_sampler,
                &self.targets,
            );
        }
    }

    fn scene_uniforms(&self, orbit: &OrbitCamera) -> SceneUniforms {
        let view = orbit.view_matrix();
        let view_proj = self.camera.projection_matrix() * view;
        let eye = orbit.eye();
        let light = fixed_light_vec3();
        // Rows of the view rotation are the camera basis in world space.
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, self.star_rotation],
            light_pos: [light.x, light.y, light.z, LIGHT_INTENSITY],
            bar_color: [BAR_COLOR[0], BAR_COLOR[1], BAR_COLOR[2], BAR_SIZE],
            star_params: [STAR_COLOR[0], STAR_COLOR[1], STAR_COLOR[2], STAR_SIZE],
            camera_right: [right.x, right.y, right.z, 0.0],
            camera_up: [up.x, up.y, up.z, 0.0],
        }
    }

    fn post_uniforms(&self, blur_dir: [f32; 2]) -> PostUniforms {
        let (bw, bh) = targets::bloom_size(self.width, self.height);
        PostUniforms {
            resolution: [bw as f32, bh as f32],
            exposure: TONE_EXPOSURE,
            blur_dir,
            bloom_strength: self.bloom_strength,
            threshold: BLOOM_THRESHOLD,
            radius: BLOOM_RADIUS,
        }
    }

    pub fn render(&mut self, orbit: &OrbitCamera) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = self.scene_uniforms(orbit);
        self.queue
            .write_buffer(&self.scene.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        let bars = layout::bar_instances(&self.bar_scales);
        self.queue
            .write_buffer(&self.scene.bar_buffer, 0, bytemuck::cast_slice(&bars));

        for (pass, dir) in [
            (PostPass::Bright, [0.0, 0.0]),
            (PostPass::BlurH, [1.0, 0.0]),
            (PostPass::BlurV, [0.0, 1.0]),
            (PostPass::Composite, [0.0, 0.0]),
        ] {
            post::write_post_uniforms(&self.queue, &self.post, pass, self.post_uniforms(dir));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: stars + bars → HDR
        scene::draw_scene(
            &mut encoder,
            &self.scene,
            &self.targets.hdr_view,
            &self.targets.depth_view,
            self.clear_color,
        );

        // Pass 2: bright pass → bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.bind_groups.bright_from_hdr,
            None,
        );

        // Pass 3: blur horizontal bloom_a -> bloom_b
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bind_groups.blur_h_from_bloom_a,
            None,
        );

        // Pass 4: blur vertical bloom_b -> bloom_a
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bind_groups.blur_v_from_bloom_b,
            None,
        );

        // Pass 5: composite to swapchain
        post::blit(
            &mut encoder,
            "composite",
            &view,
            self.clear_color,
            &self.post.composite_pipeline,
            &self.bind_groups.composite_from_hdr,
            Some(&self.bind_groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl RenderTarget for GpuState<'_> {
    fn set_bar_scale(&mut self, index: usize, scale: f32) {
        if let Some(s) = self.bar_scales.get_mut(index) {
            *s = scale;
        }
    }

    fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom_strength = strength;
    }

    fn set_fov(&mut self, fov_degrees: f32) {
        self.camera.set_fov(fov_degrees);
    }

    fn on_fov_changed(&mut self) {
        self.camera.update_projection_matrix();
    }

    fn add_rotation(&mut self, delta_radians: f32) {
        self.star_rotation = wrap_radians(self.star_rotation + delta_radians);
    }
}
