/// One dynamic-offset uniform buffer holding a [`UniformBlock`] per draw.
///
/// A shared program (the picking material) gets a different value for every
/// mesh drawn with it, so each draw owns a slot and binds it by offset.  The
/// bind group never changes between draws.
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Per-draw shader inputs, laid out to match `hotspot.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct UniformBlock {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub viewport: [f32; 4],
    /// `x` opacity, `y` projection kind, `z` 1.0 when a texture is bound.
    pub params: [f32; 4],
}

const BLOCK_SIZE: u64 = std::mem::size_of::<UniformBlock>() as u64;

pub struct UniformSlots {
    pub buffer: wgpu::Buffer,
    pub bind_group: Arc<wgpu::BindGroup>,
    /// Byte distance between slots, a multiple of the device alignment.
    pub stride: u32,
    capacity: usize,
}

impl UniformSlots {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, initial_capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(BLOCK_SIZE as u32, alignment);
        let capacity = initial_capacity.max(1);
        let buffer = Self::create_buffer(device, capacity, stride);
        let bind_group = Self::create_bind_group(device, layout, &buffer);
        Self {
            buffer,
            bind_group: Arc::new(bind_group),
            stride,
            capacity,
        }
    }

    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        (index as u32).wrapping_mul(self.stride)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn write(&self, queue: &wgpu::Queue, index: usize, block: &UniformBlock) {
        debug_assert!(index < self.capacity, "uniform slot out of range");
        queue.write_buffer(&self.buffer, self.offset(index) as u64, bytemuck::bytes_of(block));
    }

    /// Grow (doubling) until `needed` slots fit.  Reallocates the bind group,
    /// so anything recorded against the old one must be re-recorded.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout, needed: usize) {
        if needed <= self.capacity {
            return;
        }
        let mut cap = self.capacity;
        while cap < needed {
            cap *= 2;
        }
        self.buffer = Self::create_buffer(device, cap, self.stride);
        self.bind_group = Arc::new(Self::create_bind_group(device, layout, &self.buffer));
        self.capacity = cap;
    }

    fn create_buffer(device: &wgpu::Device, capacity: usize, stride: u32) -> wgpu::Buffer {
        let data = vec![0u8; capacity * stride as usize];
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("UniformSlots"),
            contents: &data,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_bind_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("UniformSlots BindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(BLOCK_SIZE),
                }),
            }],
        })
    }
}

/// Round up to a power-of-two `alignment`.
#[inline]
fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}
