use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use dotmorph::{
    FrameRequest, FrameScheduler, Reveal, Viewport, WgpuContext, dot_to_text_source,
};

#[derive(Parser, Debug)]
#[command(name = "dotmorph", version)]
struct Cli {
    /// Text to reveal (truncated to the configured glyph count).
    #[arg(long, default_value = "MORPH")]
    text: String,

    /// Output directory for frame PNGs.
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Milliseconds advanced per rendered frame.
    #[arg(long, default_value_t = 16.0)]
    step_ms: f64,

    /// Upper bound on rendered frames, in case the animation never settles.
    #[arg(long, default_value_t = 600)]
    max_frames: u32,
}

/// Offline stand-in for the host's frame scheduler: requests are handed out in
/// sequence and cancellation has nothing to revoke.
struct StepScheduler {
    next: u64,
}

impl FrameScheduler for StepScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        FrameRequest(self.next)
    }

    fn cancel_frame(&mut self, _request: FrameRequest) {}
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let viewport = Viewport {
        width: cli.width,
        height: cli.height,
    };
    let mut gpu = WgpuContext::new(viewport)?;
    let mut scheduler = StepScheduler { next: 0 };

    let mut reveal = Reveal::new(
        &mut gpu,
        &mut scheduler,
        &dot_to_text_source(),
        viewport,
        Some(&cli.text),
        &serde_json::json!({}),
    )?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output dir '{}'", cli.out.display()))?;

    for frame in 0..cli.max_frames {
        // Deterministic playback: seek rather than trust the wall clock.
        reveal.renderer_mut().set_tick(f64::from(frame) * cli.step_ms);
        let finished = reveal.on_frame(&mut gpu, &mut scheduler)?;

        let image = gpu.read_frame()?;
        let path = cli.out.join(format!("frame_{frame:04}.png"));
        image::save_buffer_with_format(
            &path,
            &image.data,
            image.width,
            image.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;

        if finished {
            eprintln!("settled after {} frames", frame + 1);
            break;
        }
    }

    eprintln!("wrote frames to {}", cli.out.display());
    Ok(())
}
