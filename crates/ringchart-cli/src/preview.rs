use crate::config;
use gtk::prelude::*;
use gtk4 as gtk;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use relm4::prelude::*;
use ringchart::FrameRenderer;
use std::cell::RefCell;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct Playback {
    renderer: FrameRenderer,
    started: Instant,
}

pub struct PreviewModel {
    path: PathBuf,
    playback: Rc<RefCell<Playback>>,
    drawing_area: gtk::DrawingArea,
    /// Dropping it stops the reloads.
    _watcher: Option<RecommendedWatcher>,
}

#[derive(Debug)]
pub enum PreviewMsg {
    Restart,
    Reload,
}

fn load_renderer(path: &Path) -> anyhow::Result<FrameRenderer> {
    let chart = config::load_chart(path)?;
    Ok(FrameRenderer::new(chart.config)?)
}

/// Editors often replace the file instead of writing it, so the whole directory is watched.
fn changes_file(event: &Event, file_name: Option<&OsStr>) -> bool {
    !matches!(event.kind, EventKind::Access(_))
        && event.paths.iter().any(|p| p.file_name() == file_name)
}

/// Pings `changed` after modifications of `path`. Bursts of events collapse into one ping
/// while the previous one is still pending.
fn watch_chart(
    path: &Path,
    changed: async_channel::Sender<()>,
) -> notify::Result<RecommendedWatcher> {
    let file_name = path.file_name().map(OsStr::to_os_string);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if changes_file(&event, file_name.as_deref()) => {
            let _ = changed.try_send(());
        }
        Ok(_) => {}
        Err(e) => log::error!("Watch error: {}", e),
    })?;
    watcher.watch(path.parent().unwrap_or(Path::new(".")), RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[relm4::component(pub)]
impl SimpleComponent for PreviewModel {
    type Init = (PathBuf, FrameRenderer);
    type Input = PreviewMsg;
    type Output = ();

    view! {
        #[root]
        gtk::Window {
            set_title: Some("Ring chart preview"),
            set_default_size: (default_width, default_height),

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,

                add_controller = gtk::GestureClick {
                    connect_released[sender] => move |_, _, _, _| {
                        sender.input(PreviewMsg::Restart);
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (path, renderer) = init;
        let size = renderer.size();
        let default_width = size.width.ceil() as i32 + 40;
        let default_height = size.height.ceil() as i32 + 40;

        let model = PreviewModel {
            path,
            playback: Rc::new(RefCell::new(Playback {
                renderer,
                started: Instant::now(),
            })),
            drawing_area: gtk::DrawingArea::default(),
            _watcher: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let playback_draw = model.playback.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                let playback = playback_draw.borrow();
                let size = playback.renderer.size();
                cr.translate(
                    ((width as f64 - size.width) / 2.0).floor(),
                    ((height as f64 - size.height) / 2.0).floor(),
                );
                let time = playback.started.elapsed().as_secs_f64();
                if let Err(e) = playback.renderer.draw(cr, time) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let area = widgets.drawing_area.clone();
        glib::timeout_add_local(FRAME_INTERVAL, move || {
            area.queue_draw();
            glib::ControlFlow::Continue
        });

        let (changed_tx, changed_rx) = async_channel::bounded(1);
        match watch_chart(&model.path, changed_tx) {
            Ok(watcher) => {
                model._watcher = Some(watcher);
                let sender_clone = sender.clone();
                relm4::spawn(async move {
                    while changed_rx.recv().await.is_ok() {
                        sender_clone.input(PreviewMsg::Reload);
                    }
                });
            }
            Err(e) => log::error!("Not watching {}: {}", model.path.display(), e),
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            PreviewMsg::Restart => {
                self.playback.borrow_mut().started = Instant::now();
            }
            PreviewMsg::Reload => match load_renderer(&self.path) {
                Ok(renderer) => {
                    *self.playback.borrow_mut() = Playback {
                        renderer,
                        started: Instant::now(),
                    };
                    self.drawing_area.queue_draw();
                    log::info!("Reloaded {}", self.path.display());
                }
                Err(e) => log::error!("Failed to reload {}: {:#}", self.path.display(), e),
            },
        }
    }
}

/// Opens the preview window and blocks until it is closed.
pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let renderer = load_renderer(&path)?;
    log::info!("Previewing {}", path.display());

    let app = RelmApp::new("org.ringchart.preview").with_args(Vec::new());
    app.run::<PreviewModel>((path, renderer));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind, RemoveKind};

    #[test]
    fn test_only_changes_to_the_chart_count() {
        let chart = Some(OsStr::new("chart.toml"));
        let cases = vec![
            (EventKind::Modify(ModifyKind::Any), "/charts/chart.toml", true),
            (EventKind::Remove(RemoveKind::File), "/charts/chart.toml", true),
            (EventKind::Modify(ModifyKind::Any), "/charts/style.toml", false),
            (EventKind::Access(AccessKind::Any), "/charts/chart.toml", false),
        ];

        for (kind, path, expected) in cases {
            let event = Event::new(kind).add_path(PathBuf::from(path));
            assert_eq!(changes_file(&event, chart), expected, "{path}");
        }
    }
}
