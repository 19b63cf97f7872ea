//! crossterm mouse events -> chart gestures.

use crate::layout::{PX_PER_COL, PaneLayout};
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use fenshi_chart::{Gesture, Pane};

/// Horizontal pixels scrolled per wheel notch.
const WHEEL_STEP: f64 = 3.0 * PX_PER_COL;

/// Tracks drag and hover across mouse events.
#[derive(Debug, Default)]
pub struct MouseTracker {
    drag_column: Option<u16>,
    over: bool,
}

impl MouseTracker {
    pub fn translate(&mut self, event: MouseEvent, layout: &PaneLayout) -> Vec<Gesture> {
        let pane = layout.pane_at(event.column, event.row);
        let x = layout.chart_x(event.column);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(pane) = pane else {
                    return Vec::new();
                };
                self.drag_column = Some(event.column);
                if pane == Pane::TimeAxis {
                    vec![Gesture::AxisClick { x }]
                } else {
                    Vec::new()
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(previous) = self.drag_column else {
                    return Vec::new();
                };
                self.drag_column = Some(event.column);
                let dx = (f64::from(event.column) - f64::from(previous)) * PX_PER_COL;
                let mut gestures = vec![Gesture::PointerMove {
                    x,
                    y: layout.chart_y(event.row),
                    dragging: true,
                }];
                if dx != 0.0 {
                    gestures.push(Gesture::DragDelta { dx });
                }
                gestures
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_column = None;
                Vec::new()
            }
            MouseEventKind::Moved => match pane {
                Some(_) => {
                    let mut gestures = Vec::with_capacity(2);
                    if !self.over {
                        self.over = true;
                        gestures.push(Gesture::PointerEnter);
                    }
                    gestures.push(Gesture::PointerMove {
                        x,
                        y: layout.chart_y(event.row),
                        dragging: false,
                    });
                    gestures
                }
                None if self.over => {
                    self.over = false;
                    vec![Gesture::PointerLeave]
                }
                None => Vec::new(),
            },
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let Some(pane) = pane else {
                    return Vec::new();
                };
                let dy = if event.kind == MouseEventKind::ScrollDown {
                    WHEEL_STEP
                } else {
                    -WHEEL_STEP
                };
                vec![Gesture::Wheel {
                    dx: 0.0,
                    dy,
                    shift: event.modifiers.contains(KeyModifiers::SHIFT),
                    pane,
                }]
            }
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => {
                let Some(pane) = pane else {
                    return Vec::new();
                };
                let dx = if event.kind == MouseEventKind::ScrollRight {
                    WHEEL_STEP
                } else {
                    -WHEEL_STEP
                };
                vec![Gesture::Wheel {
                    dx,
                    dy: 0.0,
                    shift: false,
                    pane,
                }]
            }
            _ => Vec::new(),
        }
    }
}
