//! Interactive preview of an invention's 3D model.
//!
//! The mesh arrives already decoded from the backend worker; this module only
//! owns the camera, the lighting environment, and painting. Triangles are
//! flat-shaded on the CPU and drawn back to front through the egui painter.

use std::sync::Arc;

use client_core::ModelFormat;
use eframe::egui;
use glam::{Mat4, Vec3};

use crate::controller::events::ModelKey;
use crate::media::{self, TriangleMesh};
use crate::ui::theme;

const FIELD_OF_VIEW: f32 = 45.0_f32 * std::f32::consts::PI / 180.0;
const MIN_DISTANCE: f32 = 0.6;
const MAX_DISTANCE: f32 = 8.0;
const PITCH_LIMIT: f32 = 1.5;
const ORBIT_SPEED: f32 = 0.01;
const ZOOM_SPEED: f32 = 0.002;
const VIEWPORT_HEIGHT: f32 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
            distance: 2.0,
        }
    }
}

impl OrbitCamera {
    /// Screen-space drag in points.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * ZOOM_SPEED)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(FIELD_OF_VIEW, aspect.max(0.01), 0.05, 50.0);
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        projection * view
    }
}

/// Maps a world-space point into `rect`. `None` when it sits behind the camera.
/// The second value is the clip-space depth used for back-to-front ordering.
pub fn project(view_projection: &Mat4, point: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
    let clip = *view_projection * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let center = rect.center();
    Some((
        egui::pos2(
            center.x + ndc.x * rect.width() * 0.5,
            center.y - ndc.y * rect.height() * 0.5,
        ),
        clip.w,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentPreset {
    #[default]
    Studio,
    Sunset,
    Night,
}

/// Background and light palette for one preset. `Vec3` colors are RGB in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub background: egui::Color32,
    pub surface: Vec3,
    pub ambient: Vec3,
    pub spot_color: Vec3,
    pub spot_position: Vec3,
    /// Cosines of the full-intensity and cut-off half angles.
    pub spot_inner_cos: f32,
    pub spot_outer_cos: f32,
}

impl EnvironmentPreset {
    pub const ALL: [EnvironmentPreset; 3] = [
        EnvironmentPreset::Studio,
        EnvironmentPreset::Sunset,
        EnvironmentPreset::Night,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnvironmentPreset::Studio => "Studio",
            EnvironmentPreset::Sunset => "Sunset",
            EnvironmentPreset::Night => "Night",
        }
    }

    pub fn lighting(self) -> Lighting {
        match self {
            EnvironmentPreset::Studio => Lighting {
                background: egui::Color32::from_rgb(58, 60, 66),
                surface: Vec3::new(0.82, 0.84, 0.88),
                ambient: Vec3::splat(0.28),
                spot_color: Vec3::splat(0.95),
                spot_position: Vec3::new(2.0, 3.0, 2.5),
                spot_inner_cos: 0.94,
                spot_outer_cos: 0.80,
            },
            EnvironmentPreset::Sunset => Lighting {
                background: egui::Color32::from_rgb(74, 44, 52),
                surface: Vec3::new(0.90, 0.80, 0.72),
                ambient: Vec3::new(0.30, 0.20, 0.22),
                spot_color: Vec3::new(1.0, 0.68, 0.40),
                spot_position: Vec3::new(-3.0, 1.5, 2.0),
                spot_inner_cos: 0.92,
                spot_outer_cos: 0.75,
            },
            EnvironmentPreset::Night => Lighting {
                background: egui::Color32::from_rgb(14, 18, 30),
                surface: Vec3::new(0.70, 0.76, 0.90),
                ambient: Vec3::new(0.08, 0.10, 0.16),
                spot_color: Vec3::new(0.60, 0.72, 1.0),
                spot_position: Vec3::new(0.5, 3.5, 1.0),
                spot_inner_cos: 0.96,
                spot_outer_cos: 0.86,
            },
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl Lighting {
    /// Spot intensity at `point`: 1 inside the inner cone, 0 past the outer one.
    pub fn spot_falloff(&self, point: Vec3) -> f32 {
        let axis = (-self.spot_position).normalize_or_zero();
        let to_point = (point - self.spot_position).normalize_or_zero();
        smoothstep(self.spot_outer_cos, self.spot_inner_cos, axis.dot(to_point))
    }

    /// Flat shade for one face. Faces are lit two-sided, so the normal is
    /// flipped toward the viewer first.
    pub fn shade(&self, normal: Vec3, centroid: Vec3, eye: Vec3) -> Vec3 {
        let normal = if normal.dot(eye - centroid) < 0.0 {
            -normal
        } else {
            normal
        };
        let to_light = (self.spot_position - centroid).normalize_or_zero();
        let diffuse = normal.dot(to_light).max(0.0) * self.spot_falloff(centroid);
        (self.surface * (self.ambient + self.spot_color * diffuse)).clamp(Vec3::ZERO, Vec3::ONE)
    }
}

/// Consumes the wheel so the surrounding scroll area stays put while zooming.
fn take_vertical_scroll(input: &mut egui::InputState) -> f32 {
    std::mem::take(&mut input.smooth_scroll_delta.y)
}

fn to_color32(rgb: Vec3) -> egui::Color32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(rgb.x), channel(rgb.y), channel(rgb.z))
}

#[derive(Debug, Clone)]
pub enum ViewerState {
    Idle,
    Loading,
    Ready(Arc<TriangleMesh>),
    Unsupported(ModelFormat),
    TooLarge { limit: u64 },
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    OpenExternally,
}

pub struct ModelViewer {
    key: Option<ModelKey>,
    state: ViewerState,
    camera: OrbitCamera,
    environment: EnvironmentPreset,
}

impl Default for ModelViewer {
    fn default() -> Self {
        Self {
            key: None,
            state: ViewerState::Idle,
            camera: OrbitCamera::default(),
            environment: EnvironmentPreset::default(),
        }
    }
}

impl ModelViewer {
    pub fn key(&self) -> Option<&ModelKey> {
        self.key.as_ref()
    }

    /// Replaces whatever was shown. Returns true when the caller should
    /// fetch and decode the asset.
    pub fn mount(&mut self, key: ModelKey) -> bool {
        let format = ModelFormat::from_file_name(&key.model_file_path);
        self.state = match format {
            Some(format) if media::has_preview(format) => ViewerState::Loading,
            Some(format) => ViewerState::Unsupported(format),
            None => ViewerState::Failed(format!(
                "unrecognized model file '{}'",
                key.model_file_path
            )),
        };
        self.camera.reset();
        self.key = Some(key);
        matches!(self.state, ViewerState::Loading)
    }

    pub fn unmount(&mut self) {
        self.key = None;
        self.state = ViewerState::Idle;
    }

    /// Decoded meshes for anything but the mounted model are stale and dropped.
    pub fn accept(&mut self, key: &ModelKey, mesh: Arc<TriangleMesh>) {
        if self.key.as_ref() == Some(key) {
            self.state = ViewerState::Ready(mesh);
        }
    }

    pub fn fail(&mut self, key: &ModelKey, message: impl Into<String>) {
        if self.key.as_ref() == Some(key) && matches!(self.state, ViewerState::Loading) {
            self.state = ViewerState::Failed(message.into());
        }
    }

    pub fn too_large(&mut self, key: &ModelKey, limit: u64) {
        if self.key.as_ref() == Some(key) {
            self.state = ViewerState::TooLarge { limit };
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<ViewerAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("viewer_environment")
                .selected_text(self.environment.label())
                .show_ui(ui, |ui| {
                    for preset in EnvironmentPreset::ALL {
                        ui.selectable_value(&mut self.environment, preset, preset.label());
                    }
                });
            if ui.button("Reset view").clicked() {
                self.camera.reset();
            }
            if let ViewerState::Ready(mesh) = &self.state {
                let shown = mesh.triangles.len();
                let note = if shown < mesh.source_triangles {
                    format!("{shown} of {} triangles", mesh.source_triangles)
                } else {
                    format!("{shown} triangles")
                };
                ui.weak(note);
            }
        });

        match self.state.clone() {
            ViewerState::Idle => {}
            ViewerState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading model...");
                });
            }
            ViewerState::Ready(mesh) => self.paint(ui, &mesh),
            ViewerState::Unsupported(format) => {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new("No in-app preview").strong());
                    ui.label(format!(
                        "{} models can be uploaded and downloaded, but are not rendered here.",
                        format.label()
                    ));
                    if ui.button("Open externally").clicked() {
                        action = Some(ViewerAction::OpenExternally);
                    }
                });
            }
            ViewerState::TooLarge { limit } => {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new("No in-app preview").strong());
                    ui.label(format!(
                        "This model is larger than {} MB, the limit for in-app previews.",
                        limit / (1024 * 1024)
                    ));
                    if ui.button("Open externally").clicked() {
                        action = Some(ViewerAction::OpenExternally);
                    }
                });
            }
            ViewerState::Failed(message) => {
                ui.colored_label(theme::ERROR_TEXT, message);
                if ui.button("Open externally").clicked() {
                    action = Some(ViewerAction::OpenExternally);
                }
            }
        }
        action
    }

    fn paint(&mut self, ui: &mut egui::Ui, mesh: &TriangleMesh) {
        let size = egui::vec2(ui.available_width(), VIEWPORT_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.orbit(delta.x, delta.y);
        }
        if response.hovered() {
            let scroll = ui.input_mut(take_vertical_scroll);
            if scroll != 0.0 {
                self.camera.zoom(scroll);
            }
        }

        let rect = response.rect;
        let lighting = self.environment.lighting();
        painter.rect_filled(rect, egui::CornerRadius::same(6), lighting.background);

        let view_projection = self.camera.view_projection(rect.width() / rect.height());
        let eye = self.camera.eye();
        let mut faces: Vec<(f32, [egui::Pos2; 3], egui::Color32)> = mesh
            .triangles
            .iter()
            .filter_map(|triangle| {
                let [a, b, c] = triangle.vertices;
                let (pa, da) = project(&view_projection, a, rect)?;
                let (pb, db) = project(&view_projection, b, rect)?;
                let (pc, dc) = project(&view_projection, c, rect)?;
                let centroid = (a + b + c) / 3.0;
                let color = to_color32(lighting.shade(triangle.normal, centroid, eye));
                Some(((da + db + dc) / 3.0, [pa, pb, pc], color))
            })
            .collect();
        faces.sort_by(|left, right| right.0.total_cmp(&left.0));

        let mut shape = egui::Mesh::default();
        for (_, points, color) in faces {
            let base = shape.vertices.len() as u32;
            for point in points {
                shape.colored_vertex(point, color);
            }
            shape.add_triangle(base, base + 1, base + 2);
        }
        painter.add(egui::Shape::mesh(shape));
    }
}
