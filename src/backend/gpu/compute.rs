use std::borrow::Cow;

pub const WORKGROUP_SIZE: u32 = 256;

/// Workgroup count for one dispatch over `particle_count` invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    pub particle_count: u32,
    pub dispatch_x: u32,
}

impl DispatchPlan {
    pub fn new(particle_count: u32) -> Self {
        let dispatch_x = if particle_count == 0 {
            0
        } else {
            ((particle_count - 1) / WORKGROUP_SIZE) + 1
        };
        Self { particle_count, dispatch_x }
    }
}

/// Both compute pipelines plus their shared layout
pub struct StepPipelines {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub integrate: wgpu::ComputePipeline,
    pub resolve: wgpu::ComputePipeline,
}

impl StepPipelines {
    pub fn new(device: &wgpu::Device) -> Self {
        let storage = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("spheres.step.bgl"),
            entries: &[
                storage(0),
                storage(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage(3),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("spheres.step.pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader_source = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sphere_step.wgsl"));
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spheres.step.shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(shader_source)),
        });

        let pipeline = |label, entry_point| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        };

        Self {
            integrate: pipeline("spheres.integrate.pipeline", "integrate_main"),
            resolve: pipeline("spheres.resolve.pipeline", "resolve_main"),
            bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_rounds_up() {
        assert_eq!(DispatchPlan::new(1_001).dispatch_x, 4);
        assert_eq!(DispatchPlan::new(256).dispatch_x, 1);
        assert_eq!(DispatchPlan::new(257).dispatch_x, 2);
        assert_eq!(DispatchPlan::new(0).dispatch_x, 0);
    }

    #[test]
    fn shader_declares_both_entry_points() {
        let source = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sphere_step.wgsl"));
        assert!(source.contains("fn integrate_main"));
        assert!(source.contains("fn resolve_main"));
        assert!(source.contains(&format!("@workgroup_size({}", WORKGROUP_SIZE)));
    }
}
