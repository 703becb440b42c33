/// One acquired swapchain image plus the encoder recording into it.
///
/// Hold it only for the frame: the surface will not hand out another image
/// until this one is submitted and dropped.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
