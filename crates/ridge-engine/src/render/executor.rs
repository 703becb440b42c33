use anyhow::{bail, Context, Result};

use crate::coords::Viewport;
use crate::paint::Color;

use super::{BufferId, BufferSet, CommandList, FrameCommand, GpuProgram, RenderCtx, RenderTarget};

/// State that survives a pass boundary.
#[derive(Default)]
struct PassState {
    viewport: Option<Viewport>,
    program_bound: bool,
    /// Buffer per vertex slot.
    vertex_buffers: Vec<Option<BufferId>>,
}

impl PassState {
    fn bind(&mut self, slot: u32, buffer: BufferId) {
        let slot = slot as usize;
        if self.vertex_buffers.len() <= slot {
            self.vertex_buffers.resize(slot + 1, None);
        }
        self.vertex_buffers[slot] = Some(buffer);
    }

    /// Vertices readable from every bound slot.
    fn readable_vertices(&self, buffers: &BufferSet) -> Option<u32> {
        self.vertex_buffers
            .iter()
            .flatten()
            .filter_map(|id| buffers.get(*id).map(|b| b.element_count()))
            .min()
    }
}

/// Replays a recorded [`CommandList`] into `target`.
///
/// Every `Clear` starts a new render pass; viewport, program and vertex
/// bindings carry over into it. Uniform writes go through the queue and so
/// hold for the whole submission. A segment with neither a clear nor a draw
/// opens no pass.
pub fn execute(
    commands: &CommandList,
    ctx: &RenderCtx<'_>,
    target: &mut RenderTarget<'_>,
    program: &GpuProgram,
    buffers: &BufferSet,
) -> Result<()> {
    let mut state = PassState::default();

    for segment in segments(commands.commands()) {
        let clear = match segment.first() {
            Some(FrameCommand::Clear(c)) => Some(*c),
            _ => None,
        };
        let has_draw = segment
            .iter()
            .any(|c| matches!(c, FrameCommand::Draw { .. }));

        if clear.is_none() && !has_draw {
            // Still track state so later passes see it.
            for cmd in segment {
                apply_state(cmd, ctx, program, &mut state)?;
            }
            continue;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ridge frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: load_op(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // Re-apply carried state.
        if let Some(vp) = state.viewport.filter(|vp| vp.is_valid()) {
            rpass.set_viewport(0.0, 0.0, vp.width as f32, vp.height as f32, 0.0, 1.0);
        }
        if state.program_bound {
            rpass.set_pipeline(program.pipeline());
            rpass.set_bind_group(0, program.bind_group(), &[]);
        }
        for (slot, &id) in state.vertex_buffers.iter().enumerate() {
            if let Some(buf) = id.and_then(|id| buffers.get(id)) {
                rpass.set_vertex_buffer(slot as u32, buf.raw().slice(..));
            }
        }

        for cmd in segment {
            apply_state(cmd, ctx, program, &mut state)?;
            match cmd {
                FrameCommand::SetViewport(vp) if vp.is_valid() => {
                    rpass.set_viewport(0.0, 0.0, vp.width as f32, vp.height as f32, 0.0, 1.0);
                }
                FrameCommand::UseProgram => {
                    rpass.set_pipeline(program.pipeline());
                    rpass.set_bind_group(0, program.bind_group(), &[]);
                }
                FrameCommand::BindVertexBuffer { buffer, attribute, .. } => {
                    let slot = program
                        .vertex_slot(*attribute)
                        .with_context(|| format!("attribute {} has no vertex slot", attribute.0))?;
                    let buf = buffers
                        .get(*buffer)
                        .with_context(|| format!("unknown buffer {:?}", buffer))?;
                    rpass.set_vertex_buffer(slot, buf.raw().slice(..));
                }
                FrameCommand::Draw { mode, first, count } => {
                    if !state.program_bound {
                        bail!("draw recorded before a program was in use");
                    }
                    if *mode != program.draw_mode() {
                        bail!(
                            "draw mode {:?} does not match the program's {:?}",
                            mode,
                            program.draw_mode()
                        );
                    }
                    let end = first
                        .checked_add(*count)
                        .context("draw range overflows u32")?;
                    let readable = state.readable_vertices(buffers).unwrap_or(0);
                    if end > readable {
                        bail!("draw of {first}..{end} exceeds the {readable} bound vertices");
                    }
                    if *count > 0 {
                        rpass.draw(*first..end, 0..1);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Updates carried state and flushes uniform values to the queue.
fn apply_state(
    cmd: &FrameCommand,
    ctx: &RenderCtx<'_>,
    program: &GpuProgram,
    state: &mut PassState,
) -> Result<()> {
    match cmd {
        FrameCommand::SetViewport(vp) => state.viewport = Some(*vp),
        FrameCommand::UseProgram => state.program_bound = true,
        FrameCommand::SetUniform { location, value } => {
            if !state.program_bound {
                bail!("uniform set before a program was in use");
            }
            program.write_uniform(ctx.queue, *location, value)?;
        }
        FrameCommand::BindVertexBuffer { buffer, attribute, .. } => {
            if let Some(slot) = program.vertex_slot(*attribute) {
                state.bind(slot, *buffer);
            }
        }
        FrameCommand::Clear(_) | FrameCommand::Draw { .. } => {}
    }
    Ok(())
}

fn load_op(clear: Option<Color>) -> wgpu::LoadOp<wgpu::Color> {
    match clear {
        Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
        None => wgpu::LoadOp::Load,
    }
}

/// Splits the stream so each `Clear` begins a segment.
fn segments(commands: &[FrameCommand]) -> Vec<&[FrameCommand]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, cmd) in commands.iter().enumerate() {
        if matches!(cmd, FrameCommand::Clear(_)) && i > start {
            out.push(&commands[start..i]);
            start = i;
        }
    }
    if start < commands.len() {
        out.push(&commands[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawMode, UniformValue};
    use crate::shader::UniformLocation;

    #[test]
    fn clears_start_segments() {
        let cmds = [
            FrameCommand::SetViewport(Viewport::new(4, 4)),
            FrameCommand::Clear(Color::BLACK),
            FrameCommand::UseProgram,
            FrameCommand::Draw { mode: DrawMode::LineStrip, first: 0, count: 2 },
            FrameCommand::Clear(Color::BLACK),
        ];
        let segs = segments(&cmds);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].len(), 1);
        assert!(matches!(segs[1][0], FrameCommand::Clear(_)));
        assert_eq!(segs[1].len(), 3);
        assert_eq!(segs[2].len(), 1);
    }

    #[test]
    fn leading_clear_is_not_split_off() {
        let cmds = [
            FrameCommand::Clear(Color::BLACK),
            FrameCommand::SetUniform {
                location: UniformLocation { group: 0, binding: 0 },
                value: UniformValue::Float(0.0),
            },
        ];
        assert_eq!(segments(&cmds).len(), 1);
    }

    #[test]
    fn empty_stream_has_no_segments() {
        assert!(segments(&[]).is_empty());
    }

    #[test]
    fn load_op_follows_clear() {
        assert!(matches!(load_op(None), wgpu::LoadOp::Load));
        assert!(matches!(load_op(Some(Color::BLACK)), wgpu::LoadOp::Clear(_)));
    }
}
