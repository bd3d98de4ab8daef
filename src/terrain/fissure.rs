//! Recursive fissure tracing into a [`ScalarField2D`].
//!
//! A trace walks a straight line from a start point, stamping a square of
//! crack cells at every step, then branches into shorter and thinner child
//! traces from its end point. Recursion runs on an explicit work stack;
//! children are pushed in reverse and their deviation angles are drawn when
//! popped, so the RNG sees the same draw order a depth-first recursive walk
//! would produce.

use rand::Rng;

use super::heightmap::ScalarField2D;

/// Children never start from traces shorter than this.
const MIN_LENGTH: i32 = 1;
/// Length divisor applied per generation.
const LENGTH_DECAY: f32 = 1.25;

/// How a finished trace chooses its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChildPolicy {
    /// Draw a count in `[1, 4]`: the clockwise child always spawns, the
    /// counter-clockwise child only when the count is at least 2.
    #[default]
    Fissure,
    /// Both children always spawn and no count is drawn.
    Binary,
}

/// Heading change applied to a task when it is popped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deviation {
    None,
    /// `+[15, 55)` degrees
    Clockwise,
    /// `-[15, 55)` degrees
    CounterClockwise,
    /// `+[140, 220)` degrees, for the second root of a fissure
    Opposite,
}

impl Deviation {
    fn draw<R: Rng>(self, rng: &mut R) -> i32 {
        match self {
            Deviation::None => 0,
            Deviation::Clockwise => rng.gen_range(15..55),
            Deviation::CounterClockwise => -rng.gen_range(15..55),
            Deviation::Opposite => rng.gen_range(140..220),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TraceTask {
    heading: i32,
    deviation: Deviation,
    x: i32,
    y: i32,
    length: i32,
    thickness: i32,
}

/// One stamped step of a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TracedPoint {
    pub x: i32,
    pub y: i32,
    /// Half side of the stamped square
    pub radius: i32,
}

/// What a trace run did to the field.
#[derive(Clone, Debug, Default)]
pub struct TraceReport {
    /// Traces that walked at least one step
    pub segments: usize,
    /// Cells converted to crack
    pub cells_carved: usize,
    /// Every stamped step, in walk order
    pub points: Vec<TracedPoint>,
}

/// Traces branching fissures into a field using an explicit RNG.
pub struct FissureTracer<'a, R: Rng> {
    field: &'a mut ScalarField2D,
    rng: &'a mut R,
    policy: ChildPolicy,
}

impl<'a, R: Rng> FissureTracer<'a, R> {
    pub fn new(field: &'a mut ScalarField2D, rng: &'a mut R) -> Self {
        Self { field, rng, policy: ChildPolicy::Fissure }
    }

    pub fn with_policy(mut self, policy: ChildPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Two root traces through one point: one at `angle`, one roughly opposite.
    pub fn fissure(&mut self, angle: i32, x: i32, y: i32, length: i32, thickness: i32) -> TraceReport {
        let root = |deviation| TraceTask { heading: angle, deviation, x, y, length, thickness };
        self.run(vec![root(Deviation::Opposite), root(Deviation::None)])
    }

    /// A single branching trace from `(x, y)` heading `angle` degrees.
    pub fn trace(&mut self, angle: i32, x: i32, y: i32, length: i32, thickness: i32) -> TraceReport {
        self.run(vec![TraceTask {
            heading: angle,
            deviation: Deviation::None,
            x,
            y,
            length,
            thickness,
        }])
    }

    fn run(&mut self, mut stack: Vec<TraceTask>) -> TraceReport {
        let mut report = TraceReport::default();

        while let Some(task) = stack.pop() {
            let heading = task.heading + task.deviation.draw(&mut *self.rng);
            let thickness = task.thickness.max(0);
            if task.length < MIN_LENGTH || !self.field.in_bounds(task.x, task.y) {
                continue;
            }

            let (end_x, end_y) = self.walk(heading, task.x, task.y, task.length, thickness, &mut report);
            report.segments += 1;

            let (clockwise, counter) = match self.policy {
                ChildPolicy::Fissure => {
                    let count = self.rng.gen_range(1..=4);
                    (true, count >= 2)
                }
                ChildPolicy::Binary => (true, true),
            };

            let child = |deviation| TraceTask {
                heading,
                deviation,
                x: end_x,
                y: end_y,
                length: (task.length as f32 / LENGTH_DECAY) as i32,
                thickness: thickness - 1,
            };
            if counter {
                stack.push(child(Deviation::CounterClockwise));
            }
            if clockwise {
                stack.push(child(Deviation::Clockwise));
            }
        }

        report
    }

    /// Stamp `length` steps and return the last visited point, which may lie
    /// outside the field if the walk left it.
    fn walk(
        &mut self,
        heading: i32,
        start_x: i32,
        start_y: i32,
        length: i32,
        thickness: i32,
        report: &mut TraceReport,
    ) -> (i32, i32) {
        let radians = (heading as f32).to_radians();
        let (sin, cos) = radians.sin_cos();
        let radius = thickness / 2;
        let (mut x, mut y) = (start_x, start_y);

        for step in 0..length {
            x = (start_x as f32 + step as f32 * cos).round() as i32;
            y = (start_y as f32 + step as f32 * sin).round() as i32;
            if !self.field.in_bounds(x, y) {
                break;
            }

            for cx in x - radius..=x + radius {
                for cy in y - radius..=y + radius {
                    if self.field.carve(cx, cy) {
                        report.cells_carved += 1;
                    }
                }
            }
            report.points.push(TracedPoint { x, y, radius });
        }

        (x, y)
    }
}
