#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Beat {
    IntroTitle,
    IntroCredit,
    CreditToCorner,
    StreamLinesOut,
    DensityAxesIn,
    DensityCurve,
    SigmaLinesIn,
    SigmaLinesOut,
    DensityOut,
    PlaneAxesIn,
    JointFormula,
    UncorrelatedCloud,
    CorrelatedCloud,
    RhoSweep,
    PlaneOut,
    CloudTitle,
    CloudIn,
    CloudOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub beat: Beat,
    pub run_time: f32,
    pub hold: f32,
}

impl Step {
    const fn new(beat: Beat, run_time: f32, hold: f32) -> Self {
        Self { beat, run_time, hold }
    }

    pub fn duration(&self) -> f32 {
        self.run_time + self.hold
    }
}

const CORRELATION_STEPS: [Step; 6] = [
    Step::new(Beat::PlaneAxesIn, 1.0, 0.0),
    Step::new(Beat::JointFormula, 1.0, 1.5),
    Step::new(Beat::UncorrelatedCloud, 1.0, 1.5),
    Step::new(Beat::CorrelatedCloud, 2.0, 0.5),
    Step::new(Beat::RhoSweep, 4.0, 2.0),
    Step::new(Beat::PlaneOut, 1.0, 1.0),
];

#[derive(Debug, Clone)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new(steps: Vec<Step>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].beat < w[1].beat), "beats must be in order");
        Self { steps }
    }

    pub fn full() -> Self {
        let mut steps = vec![
            Step::new(Beat::IntroTitle, 1.0, 2.0),
            Step::new(Beat::IntroCredit, 1.0, 1.0),
            Step::new(Beat::CreditToCorner, 1.0, 0.0),
            Step::new(Beat::StreamLinesOut, 1.0, 0.0),
            Step::new(Beat::DensityAxesIn, 1.0, 0.0),
            Step::new(Beat::DensityCurve, 2.5, 0.0),
            Step::new(Beat::SigmaLinesIn, 1.0, 1.5),
            Step::new(Beat::SigmaLinesOut, 1.0, 0.0),
            Step::new(Beat::DensityOut, 1.0, 0.0),
        ];
        steps.extend(CORRELATION_STEPS);
        steps.extend([
            Step::new(Beat::CloudTitle, 1.0, 0.0),
            Step::new(Beat::CloudIn, 2.5, 5.5),
            Step::new(Beat::CloudOut, 1.0, 0.0),
        ]);
        Self::new(steps)
    }

    pub fn correlation() -> Self {
        Self::new(CORRELATION_STEPS.to_vec())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn duration(&self) -> f32 {
        self.steps.iter().map(Step::duration).sum()
    }

    // time at which `beat` starts, if the timeline has it
    pub fn start_of(&self, beat: Beat) -> Option<f32> {
        let mut start = 0.0;
        for step in &self.steps {
            if step.beat == beat {
                return Some(start);
            }
            start += step.duration();
        }
        None
    }

    // time at which the animation of `beat` finishes and its hold begins
    pub fn animation_end(&self, beat: Beat) -> Option<f32> {
        let step = self.steps.iter().find(|step| step.beat == beat)?;
        self.start_of(beat).map(|start| start + step.run_time)
    }

    // state of the scene `t` seconds in, or `None` once it has finished
    pub fn at(&self, t: f32) -> Option<Moment> {
        let mut start = 0.0;
        for step in &self.steps {
            let end = start + step.duration();
            if t < end {
                let local = (t - start).max(0.0);
                let progress = if step.run_time > 0.0 { (local / step.run_time).min(1.0) } else { 1.0 };
                return Some(Moment { beat: step.beat, progress, elapsed: t });
            }
            start = end;
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moment {
    pub beat: Beat,
    // linear progress of the beat's animation, 1.0 throughout its hold
    pub progress: f32,
    pub elapsed: f32,
}

impl Moment {
    // linear progress of `beat`: 0 before it, 1 after it
    pub fn progress_of(&self, beat: Beat) -> f32 {
        if self.beat < beat {
            0.0
        } else if self.beat > beat {
            1.0
        } else {
            self.progress
        }
    }

    // eased progress of `beat`, for things appearing
    pub fn reveal(&self, beat: Beat) -> f32 {
        smooth(self.progress_of(beat))
    }

    // eased remaining fraction of `beat`, for things disappearing
    pub fn fade(&self, beat: Beat) -> f32 {
        1.0 - smooth(self.progress_of(beat))
    }

    // whether the moment lies within `first..=last`
    pub fn within(&self, first: Beat, last: Beat) -> bool {
        first <= self.beat && self.beat <= last
    }
}

// sigmoid ease-in/ease-out, pinned to 0 at 0 and 1 at 1
pub fn smooth(t: f32) -> f32 {
    const INFLECTION: f32 = 10.0;

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let error = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
