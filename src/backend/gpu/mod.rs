//! wgpu compute backend
//!
//! Per tick: upload the uniform block (and the explosion request), run
//! `integrate_main` then `resolve_main` as two passes, copy particles and
//! status into staging buffers and block on the map. The store always holds
//! the committed post-tick state once `advance_tick` returns.

mod buffers;
mod compute;

pub use buffers::{GpuParticle, GpuSimParams, StatusWords};
pub use compute::{DispatchPlan, WORKGROUP_SIZE};

use std::mem::size_of;
use std::sync::mpsc;

use bytemuck::{bytes_of, cast_slice};

use crate::core::SimError;
use crate::domain::{Particle, ParticleStore, TickInput, TickStats, WorldConfig};
use crate::simulation::PerfTimer;

use super::StepBackend;
use buffers::STATUS_WORDS;
use compute::StepPipelines;

pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    plan: DispatchPlan,
    pipelines: StepPipelines,
    particle_buffer: wgpu::Buffer,
    snapshot_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,
    status_buffer: wgpu::Buffer,
    particle_staging: wgpu::Buffer,
    status_staging: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    scratch: Vec<GpuParticle>,
}

impl GpuBackend {
    /// Acquire the default adapter and build the backend for `particle_count` particles
    pub fn new(particle_count: u32) -> Result<Self, SimError> {
        pollster::block_on(Self::request(particle_count))
    }

    pub async fn request(particle_count: u32) -> Result<Self, SimError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| SimError::GpuUnavailable("no suitable GPU adapter found".to_string()))?;

        let info = adapter.get_info();
        log::info!("GPU backend on {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("spheres.device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|err| SimError::GpuUnavailable(err.to_string()))?;

        Self::from_device(device, queue, particle_count)
    }

    /// Build on an existing device (shared with a renderer, or in tests).
    /// Buffers beyond the device limits, or failing allocation, are setup errors.
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        particle_count: u32,
    ) -> Result<Self, SimError> {
        let plan = DispatchPlan::new(particle_count);

        // Zero-sized bindings are invalid; keep at least one slot around
        let particle_bytes = (size_of::<GpuParticle>() as u64) * particle_count.max(1) as u64;
        let status_bytes = (size_of::<u32>() * STATUS_WORDS) as u64;
        check_particle_bytes(particle_bytes, &device.limits())?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let pipelines = StepPipelines::new(&device);
        let storage = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: particle_bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let staging = |label, size| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        let particle_buffer = storage("spheres.particles");
        let snapshot_buffer = storage("spheres.snapshot");
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spheres.params"),
            size: size_of::<GpuSimParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let status_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spheres.status"),
            size: status_bytes,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let particle_staging = staging("spheres.particles.staging", particle_bytes);
        let status_staging = staging("spheres.status.staging", status_bytes);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spheres.step.bg"),
            layout: &pipelines.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: particle_buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: snapshot_buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: params_buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 3, resource: status_buffer.as_entire_binding() },
            ],
        });

        // Scopes pop innermost first
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        let validation = pollster::block_on(device.pop_error_scope());
        if let Some(err) = out_of_memory.or(validation) {
            return Err(SimError::GpuSetup(err.to_string()));
        }

        queue.write_buffer(&status_buffer, 0, bytes_of(&StatusWords::default().0));

        Ok(Self {
            device,
            queue,
            plan,
            pipelines,
            particle_buffer,
            snapshot_buffer,
            params_buffer,
            status_buffer,
            particle_staging,
            status_staging,
            bind_group,
            scratch: Vec::with_capacity(particle_count as usize),
        })
    }

    pub fn particle_count(&self) -> u32 {
        self.plan.particle_count
    }

    fn check_count(&self, store: &ParticleStore) -> Result<(), SimError> {
        if store.len() != self.plan.particle_count as usize {
            return Err(SimError::ParticleCountMismatch {
                expected: self.plan.particle_count as usize,
                got: store.len(),
            });
        }
        Ok(())
    }

    fn encode_tick(&self, encoder: &mut wgpu::CommandEncoder) {
        if self.plan.dispatch_x > 0 {
            for (label, pipeline) in [
                ("spheres.integrate.pass", &self.pipelines.integrate),
                ("spheres.resolve.pass", &self.pipelines.resolve),
            ] {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some(label),
                    timestamp_writes: None,
                });
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.dispatch_workgroups(self.plan.dispatch_x, 1, 1);
            }
        }

        let particle_bytes = (size_of::<GpuParticle>() as u64) * self.plan.particle_count as u64;
        if particle_bytes > 0 {
            encoder.copy_buffer_to_buffer(&self.particle_buffer, 0, &self.particle_staging, 0, particle_bytes);
        }
        encoder.copy_buffer_to_buffer(
            &self.status_buffer,
            0,
            &self.status_staging,
            0,
            (size_of::<u32>() * STATUS_WORDS) as u64,
        );
    }

    /// Block until both staging buffers are mapped, then copy them out
    fn read_back(&mut self) -> Result<StatusWords, SimError> {
        let count = self.plan.particle_count as usize;
        let (tx, rx) = mpsc::channel();

        let status_slice = self.status_staging.slice(..);
        let status_tx = tx.clone();
        status_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = status_tx.send(result);
        });
        let particle_slice = self.particle_staging.slice(..);
        particle_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let _ = self.device.poll(wgpu::Maintain::Wait);

        for _ in 0..2 {
            let map_result = rx.recv().map_err(|_| SimError::GpuChannelClosed)?;
            map_result.map_err(|_| SimError::GpuBufferMap)?;
        }

        let mut words = [0u32; STATUS_WORDS];
        {
            let data = status_slice.get_mapped_range();
            words.copy_from_slice(cast_slice(&data));
        }
        {
            let data = particle_slice.get_mapped_range();
            let particles: &[GpuParticle] = cast_slice(&data);
            self.scratch.clear();
            self.scratch.extend_from_slice(&particles[..count]);
        }
        self.status_staging.unmap();
        self.particle_staging.unmap();

        Ok(StatusWords(words))
    }
}

/// Both storage bindings and the staging copy hold the whole particle array
fn check_particle_bytes(bytes: u64, limits: &wgpu::Limits) -> Result<(), SimError> {
    let limit = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    if bytes > limit {
        return Err(SimError::GpuBufferTooLarge { bytes, limit });
    }
    Ok(())
}

impl StepBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn upload(&mut self, store: &ParticleStore) -> Result<(), SimError> {
        self.check_count(store)?;
        self.scratch.clear();
        self.scratch.extend(store.iter().map(GpuParticle::from));
        if !self.scratch.is_empty() {
            self.queue.write_buffer(&self.particle_buffer, 0, cast_slice(&self.scratch));
            self.queue.write_buffer(&self.snapshot_buffer, 0, cast_slice(&self.scratch));
        }
        self.queue.write_buffer(&self.status_buffer, 0, bytes_of(&StatusWords::default().0));
        Ok(())
    }

    fn advance_tick(
        &mut self,
        store: &mut ParticleStore,
        config: &WorldConfig,
        input: &TickInput,
    ) -> Result<TickStats, SimError> {
        self.check_count(store)?;

        let t0 = PerfTimer::start();
        let params = GpuSimParams::new(config, input, self.plan.particle_count);
        self.queue.write_buffer(&self.params_buffer, 0, bytes_of(&params));
        if input.activation_request && input.trigger.is_some() {
            self.queue.write_buffer(&self.status_buffer, 0, bytes_of(&StatusWords::requesting().0));
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("spheres.tick.encoder"),
        });
        self.encode_tick(&mut encoder);
        self.queue.submit(Some(encoder.finish()));
        let collide_ms = t0.elapsed_ms();

        let t1 = PerfTimer::start();
        let status = self.read_back()?;
        for (dst, src) in store.particles_mut().iter_mut().zip(&self.scratch) {
            *dst = Particle::from(src);
        }
        if status.degenerate_pairs() > 0 {
            log::debug!("skipped {} coincident pairs on the GPU", status.degenerate_pairs());
        }
        if !status.is_clear() {
            self.queue.write_buffer(&self.status_buffer, 0, bytes_of(&StatusWords::default().0));
        }
        let readback_ms = t1.elapsed_ms();

        Ok(TickStats {
            particles_processed: self.plan.particle_count,
            activated: status.activated(),
            activation_served: status.served(),
            contacts: status.contacts(),
            degenerate_pairs: status.degenerate_pairs(),
            collide_ms,
            readback_ms,
            ..TickStats::default()
        })
    }
}
