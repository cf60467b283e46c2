use goban_core::{DetectedCircle, ImageBuffer, BOARD_SIZE};

/// A 19×19 board with one stone per intersection.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticBoard {
    pub spacing: f32,
    pub origin: f32,
    pub radius: f32,
    /// Maximum absolute center jitter, in pixels.
    pub jitter: f32,
}

impl SyntheticBoard {
    pub fn new(spacing: f32, origin: f32, radius: f32, jitter: f32) -> Self {
        Self {
            spacing,
            origin,
            radius,
            jitter,
        }
    }

    /// True pixel position of intersection `(row, col)`.
    pub fn intersection(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.origin + col as f32 * self.spacing,
            self.origin + row as f32 * self.spacing,
        )
    }

    /// Side length of a square image that holds the board plus a margin.
    pub fn image_size(&self) -> usize {
        (2.0 * self.origin + (BOARD_SIZE - 1) as f32 * self.spacing).ceil() as usize
    }

    /// Detections for every intersection, row-major, with deterministic
    /// jitter in `[-jitter, jitter]`.
    pub fn circles(&self) -> Vec<DetectedCircle> {
        let mut out = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let (x, y) = self.intersection(row, col);
                out.push(DetectedCircle::new(
                    x + self.jitter * wobble(row, col, 0),
                    y + self.jitter * wobble(row, col, 1),
                    self.radius + 0.25 * wobble(row, col, 2),
                ));
            }
        }
        out
    }

    /// [`Self::circles`] with roughly `percent`% of the detections removed
    /// by a fixed pseudo-random pattern.
    pub fn circles_missing(&self, percent: usize) -> Vec<DetectedCircle> {
        self.circles()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| (i * 37 + 11) % 100 >= percent)
            .map(|(_, c)| c)
            .collect()
    }

    /// RGB image with grid lines and alternating black/white stones.
    pub fn image(&self) -> ImageBuffer {
        let size = self.image_size();
        let mut img = ImageBuffer::filled(size, size, 3, 0).expect("alloc board image");
        for y in 0..size {
            for x in 0..size {
                let (fx, fy) = (x as f32, y as f32);
                let mut value = [205u8, 170, 110];
                let on_line = |v: f32| {
                    let t = (v - self.origin) / self.spacing;
                    t >= -0.01 && t <= (BOARD_SIZE - 1) as f32 + 0.01 && (t - t.round()).abs() * self.spacing < 1.0
                };
                if on_line(fx) || on_line(fy) {
                    value = [40, 30, 20];
                }
                let col = ((fx - self.origin) / self.spacing).round();
                let row = ((fy - self.origin) / self.spacing).round();
                if (0.0..BOARD_SIZE as f32).contains(&col) && (0.0..BOARD_SIZE as f32).contains(&row) {
                    let (cx, cy) = self.intersection(row as usize, col as usize);
                    if (fx - cx).powi(2) + (fy - cy).powi(2) <= self.radius.powi(2) {
                        value = if (row as usize + col as usize) % 2 == 0 {
                            [20, 20, 20]
                        } else {
                            [235, 235, 235]
                        };
                    }
                }
                let start = (y * size + x) * 3;
                img.data[start..start + 3].copy_from_slice(&value);
            }
        }
        img
    }
}

/// Deterministic value in `[-1, 1]`.
pub fn wobble(row: usize, col: usize, salt: usize) -> f32 {
    ((row * 131 + col * 71 + salt * 29) as f32 * 0.7548).sin()
}
