/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and simulation status to be displayed in the UI.
 */

use std::time::Duration;

// Debug information to display
#[derive(Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    // Wall time spent inside the last simulation step
    pub step_time: Duration,
    pub frames_simulated: u64,
    pub status: Option<String>,
}

impl DebugInfo {
    pub fn lines(&self, boids: usize, obstacle_mode: bool) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Step time: {:.2} ms", self.step_time.as_secs_f64() * 1000.0),
            format!("Frames simulated: {}", self.frames_simulated),
            format!("Boids: {}", boids),
            format!("Obstacles: {}", if obstacle_mode { "on" } else { "off" }),
        ];
        if let Some(status) = &self.status {
            lines.push(status.clone());
        }
        lines
    }
}
