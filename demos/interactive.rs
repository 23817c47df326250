use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Terminal;

use tui_tree_diagram::{Diagram, DiagramConfig, DiagramState};

const DOCUMENT: &str = r#"{
    "name": "flare",
    "children": [
        {
            "name": "analytics",
            "children": [
                {
                    "name": "cluster",
                    "children": [
                        {"name": "AgglomerativeCluster", "size": "3938"},
                        {"name": "CommunityStructure", "size": "3812"},
                        {"name": "HierarchicalCluster", "size": "6714"},
                        {"name": "MergeEdge", "size": "743"}
                    ]
                },
                {
                    "name": "graph",
                    "children": [
                        {"name": "BetweennessCentrality", "size": "3534"},
                        {"name": "LinkDistance", "size": "5731"},
                        {"name": "MaxFlowMinCut", "size": "7840"},
                        {"name": "ShortestPaths", "size": "5914"},
                        {"name": "SpanningTree", "size": "3416"}
                    ]
                },
                {
                    "name": "optimization",
                    "children": [{"name": "AspectRatioBanker", "size": "7074"}]
                }
            ]
        },
        {
            "name": "animate",
            "children": [
                {"name": "Easing", "size": "17010"},
                {"name": "FunctionSequence", "size": "5842"},
                {
                    "name": "interpolate",
                    "children": [
                        {"name": "ArrayInterpolator", "size": "1983"},
                        {"name": "ColorInterpolator", "size": "2047"},
                        {"name": "DateInterpolator", "size": "1375"},
                        {"name": "Interpolator", "size": "8746"},
                        {"name": "MatrixInterpolator", "size": "2202"},
                        {"name": "NumberInterpolator", "size": "1382"}
                    ]
                },
                {"name": "ISchedulable", "size": "1041"},
                {"name": "Parallel", "size": "5176"},
                {"name": "Pause", "size": "449"},
                {"name": "Scheduler", "size": "5593"},
                {"name": "Sequence", "size": "5534"},
                {"name": "Transition", "size": "9201"}
            ]
        },
        {
            "name": "data",
            "children": [
                {
                    "name": "converters",
                    "children": [
                        {"name": "Converters", "size": "721"},
                        {"name": "DelimitedTextConverter", "size": "4294"},
                        {"name": "GraphMLConverter", "size": "9800"},
                        {"name": "IDataConverter", "size": "1314"},
                        {"name": "JSONConverter", "size": "2220"}
                    ]
                },
                {"name": "DataField", "size": "1759"},
                {"name": "DataSchema", "size": "2165"},
                {"name": "DataSet", "size": "586"},
                {"name": "DataSource", "size": "3331"},
                {"name": "DataTable", "size": "772"},
                {"name": "DataUtil", "size": "3322"}
            ]
        }
    ]
}"#;

fn main() -> std::io::Result<()> {
    // Terminal initialization
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // App
    let mut state = DiagramState::new(
        DiagramConfig::new()
            .tooltip_field("size")
            .minimum_height(10),
    );
    let res = state
        .load(DOCUMENT)
        .map_err(|error| std::io::Error::other(error.to_string()))
        .and_then(|()| run_app(&mut terminal, state));

    // restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut state: DiagramState) -> std::io::Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|frame| {
            let widget = Diagram::new()
                .block(
                    Block::bordered()
                        .title("Tree Diagram")
                        .title_bottom("click to toggle, q to quit"),
                )
                .link_style(Style::new().fg(Color::DarkGray))
                .highlight_style(
                    Style::new()
                        .fg(Color::Black)
                        .bg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
                .tooltip_style(Style::new().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            frame.render_stateful_widget(widget, frame.size(), &mut state);
        })?;

        if crossterm::event::poll(Duration::from_millis(16))? {
            match crossterm::event::read()? {
                Event::Key(key) => {
                    if key.code == KeyCode::Char('q') {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    // The block border shifts the first row down by one.
                    let row = usize::from(mouse.row).saturating_sub(1);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            state.toggle_at(row);
                        }
                        MouseEventKind::Moved => {
                            state.hover_at(Some(row));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        state.tick(last_frame.elapsed());
        last_frame = Instant::now();
    }
}
