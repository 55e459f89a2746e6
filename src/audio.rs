/// Sound cues — synthesized once at startup, played fire-and-forget.
///
/// Each cue is a short mono sample buffer rendered from a fundsp node
/// graph; playing one spawns a detached rodio sink, so cues overlap
/// freely and nothing here blocks the frame loop.

use fundsp::hacker32 as dsp;
use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink};

const SAMPLE_RATE: u32 = 44_100;

/// Countdown ticks sit under the gameplay cues.
const TICK_VOLUME: f32 = 0.6;

pub struct Audio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    shot: Vec<f32>,
    target_hit: Vec<f32>,
    obstacle_hit: Vec<f32>,
    countdown_tick: Vec<f32>,
    game_over: Vec<f32>,
}

impl Audio {
    pub fn new() -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            shot: generate_shot_samples(SAMPLE_RATE),
            target_hit: generate_target_hit_samples(SAMPLE_RATE),
            obstacle_hit: generate_obstacle_hit_samples(SAMPLE_RATE),
            countdown_tick: generate_tick_samples(SAMPLE_RATE),
            game_over: generate_game_over_samples(SAMPLE_RATE),
        })
    }

    pub fn shot(&self) {
        self.play(&self.shot, 1.0);
    }

    pub fn target_hit(&self) {
        self.play(&self.target_hit, 1.0);
    }

    pub fn obstacle_hit(&self) {
        self.play(&self.obstacle_hit, 1.0);
    }

    pub fn countdown_tick(&self) {
        self.play(&self.countdown_tick, TICK_VOLUME);
    }

    pub fn game_over(&self) {
        self.play(&self.game_over, 1.0);
    }

    fn play(&self, samples: &[f32], volume: f32) {
        if let Ok(sink) = Sink::try_new(&self.handle) {
            sink.set_volume(volume);
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
            sink.detach();
        }
    }
}

// ── Cue synthesis ─────────────────────────────────────────────────────────────

/// Bowstring whoosh: band-limited noise with a fast exponential decay.
fn generate_shot_samples(sample_rate: u32) -> Vec<f32> {
    let duration = 0.12;
    let mut node = (dsp::noise() >> dsp::bandpass_hz(900.0, 0.5) >> dsp::mul(0.12))
        * dsp::lfo(move |t: f32| dsp::xerp(0.4, 0.001, (t / duration).min(1.0)));
    render_mono(&mut node, sample_rate, duration)
}

/// Two quick ascending chime notes.
fn generate_target_hit_samples(sample_rate: u32) -> Vec<f32> {
    const NOTES: [f32; 2] = [660.0, 880.0];
    let note_gap = 0.08f32;
    let note_len = 0.14f32;
    let total_duration = note_gap * (NOTES.len() as f32 - 1.0) + note_len;
    let total_samples = (sample_rate as f32 * total_duration) as usize;
    let mut samples = vec![0.0f32; total_samples];

    for (idx, freq) in NOTES.iter().enumerate() {
        let start = (note_gap * idx as f32 * sample_rate as f32) as usize;
        let mut node = dsp::sine_hz(*freq)
            * dsp::lfo(move |t: f32| dsp::xerp(0.12, 0.001, (t / note_len).min(1.0)));
        let tone = render_mono(&mut node, sample_rate, note_len);
        for (i, s) in tone.into_iter().enumerate() {
            let at = start + i;
            if at < total_samples {
                samples[at] += s;
            }
        }
    }

    samples
}

/// Low descending buzz for a wasted arrow.
fn generate_obstacle_hit_samples(sample_rate: u32) -> Vec<f32> {
    let duration = 0.3;
    let mut node = (dsp::lfo(|t: f32| dsp::lerp(220.0, 70.0, (t / 0.25).min(1.0))) >> dsp::saw())
        * dsp::lfo(move |t: f32| dsp::lerp(0.12, 0.0, (t / duration).min(1.0)));
    render_mono(&mut node, sample_rate, duration)
}

/// Short high blip for the final-seconds countdown.
fn generate_tick_samples(sample_rate: u32) -> Vec<f32> {
    let duration = 0.06;
    let mut node = dsp::sine_hz(1320.0)
        * dsp::lfo(move |t: f32| dsp::xerp(0.2, 0.001, (t / duration).min(1.0)));
    render_mono(&mut node, sample_rate, duration)
}

/// Long falling sweep when the clock runs out.
fn generate_game_over_samples(sample_rate: u32) -> Vec<f32> {
    let duration = 0.7;
    let mut node = (dsp::lfo(|t: f32| dsp::lerp(400.0, 80.0, (t / 0.55).min(1.0))) >> dsp::saw())
        * dsp::lfo(move |t: f32| dsp::lerp(0.15, 0.0, (t / duration).min(1.0)));
    render_mono(&mut node, sample_rate, duration)
}

fn render_mono(node: &mut dyn dsp::AudioUnit, sample_rate: u32, duration: f32) -> Vec<f32> {
    node.set_sample_rate(f64::from(sample_rate));
    node.reset();

    let sample_count = (sample_rate as f32 * duration) as usize;
    let mut samples = Vec::with_capacity(sample_count);
    for _ in 0..sample_count {
        samples.push(node.get_mono());
    }
    samples
}
