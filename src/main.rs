//! citydash - terminal client for the city weather dashboard

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use citydash::action::Action;
use citydash::api::ApiClient;
use citydash::components::{AppView, AppViewProps, Component};
use citydash::config::{Config, Overrides};
use citydash::effect::Effect;
use citydash::logging;
use citydash::reducer::reducer;
use citydash::runner;
use citydash::state::{AppState, View};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Terminal client for the city weather and favorites dashboard
#[derive(Parser, Debug)]
#[command(name = "citydash")]
#[command(about = "Look up city weather and manage favorite cities")]
struct Args {
    /// Backend root URL (default: http://127.0.0.1:5000)
    #[arg(long, short)]
    base_url: Option<String>,

    /// Cookie header sent with every request, e.g. "session=..."
    #[arg(long)]
    cookie: Option<String>,

    /// Config file (default: <config dir>/citydash/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log file (default: <data dir>/citydash/citydash.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start on the search page instead of the dashboard
    #[arg(long, short)]
    search: bool,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CityComponentId {
    Dashboard,
    Search,
    Alert,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CityContext {
    Dashboard,
    Search,
    Alert,
}

impl EventRoutingState<CityComponentId, CityContext> for AppState {
    fn focused(&self) -> Option<CityComponentId> {
        if self.alert.is_some() {
            return Some(CityComponentId::Alert);
        }
        match self.view {
            View::Dashboard => Some(CityComponentId::Dashboard),
            View::Search => Some(CityComponentId::Search),
        }
    }

    fn modal(&self) -> Option<CityComponentId> {
        if self.alert.is_some() {
            Some(CityComponentId::Alert)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CityComponentId) -> CityContext {
        match id {
            CityComponentId::Dashboard => CityContext::Dashboard,
            CityComponentId::Search => CityContext::Search,
            CityComponentId::Alert => CityContext::Alert,
        }
    }

    fn default_context(&self) -> CityContext {
        CityContext::Dashboard
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        base_url,
        cookie,
        config: config_path,
        log_file,
        search,
        debug: debug_args,
    } = Args::parse();

    let mut config = Config::load(config_path.as_deref()).map_err(io::Error::other)?;
    config.apply(Overrides {
        base_url,
        cookie,
        log_file,
    });

    let _log_guard = logging::init(&config.logging)?;
    tracing::info!(base_url = %config.server.base_url, "starting citydash");

    let client = ApiClient::new(&config.server.base_url, config.server.cookie.as_deref())
        .map_err(io::Error::other)?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let initial_view = if search { View::Search } else { View::Dashboard };
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(initial_view))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        replay_actions,
        Arc::new(client),
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("citydash stopped");
    Ok(())
}

struct CityUi {
    view: AppView,
}

impl CityUi {
    fn new() -> Self {
        Self {
            view: AppView::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CityComponentId>,
    ) {
        let body = match state.view {
            View::Dashboard => CityComponentId::Dashboard,
            View::Search => CityComponentId::Search,
        };
        let hidden = match state.view {
            View::Dashboard => CityComponentId::Search,
            View::Search => CityComponentId::Dashboard,
        };
        event_ctx.set_component_area(body, area);
        event_ctx.component_areas.remove(&hidden);
        if state.alert.is_some() {
            event_ctx.set_component_area(CityComponentId::Alert, area);
        } else {
            event_ctx.component_areas.remove(&CityComponentId::Alert);
        }

        let props = AppViewProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.view.render(frame, area, props);
    }
}

fn respond(actions: Vec<Action>, consume_all: bool) -> HandlerResponse<Action> {
    if actions.is_empty() && !consume_all {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: Arc<ApiClient>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CityUi::new()));
    let mut bus: EventBus<AppState, Action, CityComponentId, CityContext> = EventBus::new();
    let keybindings: Keybindings<CityContext> = Keybindings::new();

    let ui_dashboard = Rc::clone(&ui);
    bus.register(CityComponentId::Dashboard, move |event, state| {
        let actions = ui_dashboard
            .borrow_mut()
            .view
            .handle_dashboard_event(&event.kind, state);
        respond(actions, false)
    });

    // The text input owns every key while the search page is up
    let ui_search = Rc::clone(&ui);
    bus.register(CityComponentId::Search, move |event, state| {
        let actions = ui_search
            .borrow_mut()
            .view
            .handle_search_event(&event.kind, state);
        respond(actions, true)
    });

    let ui_alert = Rc::clone(&ui);
    bus.register(CityComponentId::Alert, move |event, state| {
        let actions = ui_alert
            .borrow_mut()
            .view
            .handle_alert_event(&event.kind, state);
        respond(actions, true)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::DashboardLoad),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&client)),
        )
        .await
}

/// Handle effects by spawning one task per request
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: Arc<ApiClient>) {
    let key = TaskKey::new(effect.task_key());
    ctx.tasks()
        .spawn(key, async move { runner::run(&client, effect).await });
}
