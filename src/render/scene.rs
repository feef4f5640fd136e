use super::helpers::DEPTH_FORMAT;
use app_core::scene::{BarInstance, StarInstance};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],   // xyz eye, w star rotation
    pub(crate) light_pos: [f32; 4],    // xyz fixed light, w intensity
    pub(crate) bar_color: [f32; 4],    // rgb, a bar footprint
    pub(crate) star_params: [f32; 4],  // rgb, a star size
    pub(crate) camera_right: [f32; 4],
    pub(crate) camera_up: [f32; 4],
}

pub(crate) struct SceneResources {
    pub(crate) bar_pipeline: wgpu::RenderPipeline,
    pub(crate) star_pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bar_buffer: wgpu::Buffer,
    pub(crate) bar_count: u32,
    pub(crate) star_buffer: wgpu::Buffer,
    pub(crate) star_count: u32,
}

fn depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

#[allow(clippy::too_many_arguments)]
fn make_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    vs_entry: &str,
    fs_entry: &str,
    instance_layout: wgpu::VertexBufferLayout<'_>,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[instance_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(depth_state()),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

pub(crate) fn create_scene_resources(
    device: &wgpu::Device,
    hdr_format: wgpu::TextureFormat,
    bar_count: usize,
    stars: &[StarInstance],
) -> SceneResources {
    use wgpu::util::DeviceExt;

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(app_core::SCENE_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let bar_attrs = wgpu::vertex_attr_array![0 => Float32, 1 => Float32];
    let bar_pipeline = make_scene_pipeline(
        device,
        &pl,
        &shader,
        "bar_pipeline",
        "vs_bar",
        "fs_bar",
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BarInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &bar_attrs,
        },
        hdr_format,
    );
    let star_attrs = wgpu::vertex_attr_array![0 => Float32x3];
    let star_pipeline = make_scene_pipeline(
        device,
        &pl,
        &shader,
        "star_pipeline",
        "vs_star",
        "fs_star",
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &star_attrs,
        },
        hdr_format,
    );

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_uniforms"),
        size: std::mem::size_of::<SceneUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_bg"),
        layout: &bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    let bar_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("bar_instances"),
        size: (std::mem::size_of::<BarInstance>() * bar_count.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let star_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("star_instances"),
        contents: bytemuck::cast_slice(stars),
        usage: wgpu::BufferUsages::VERTEX,
    });

    SceneResources {
        bar_pipeline,
        star_pipeline,
        uniform_buffer,
        bind_group,
        bar_buffer,
        bar_count: bar_count as u32,
        star_buffer,
        star_count: stars.len() as u32,
    }
}

pub(crate) fn draw_scene(
    encoder: &mut wgpu::CommandEncoder,
    scene: &SceneResources,
    hdr_view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
    clear: wgpu::Color,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("scene_pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: hdr_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    rpass.set_bind_group(0, &scene.bind_group, &[]);
    if scene.star_count > 0 {
        rpass.set_pipeline(&scene.star_pipeline);
        rpass.set_vertex_buffer(0, scene.star_buffer.slice(..));
        rpass.draw(0..6, 0..scene.star_count);
    }
    if scene.bar_count > 0 {
        rpass.set_pipeline(&scene.bar_pipeline);
        rpass.set_vertex_buffer(0, scene.bar_buffer.slice(..));
        rpass.draw(0..36, 0..scene.bar_count);
    }
}
