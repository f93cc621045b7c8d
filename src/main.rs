use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use siegeline::game_logic::{Battlefield, Treasury};
use siegeline::plugins::*;
use siegeline::resources::GamePhase;
use std::time::Duration;

const FRAME_LIMIT: u32 = 60 * 60 * 5;

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, LogPlugin::default()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)))
        .insert_resource(WaveSchedule {
            max_waves: Some(5),
            ..default()
        })
        .add_plugins(SiegePlugin);

    for _ in 0..FRAME_LIMIT {
        app.update();
        let phase = *app.world().resource::<State<GamePhase>>().get();
        if matches!(phase, GamePhase::Victory | GamePhase::Defeat) {
            break;
        }
    }

    let world = app.world();
    let phase = world.resource::<State<GamePhase>>().get();
    let treasury = world.resource::<Treasury>();
    let field = world.resource::<Battlefield>();
    println!("Siege ended in {:?}", phase);
    println!("  Waves: {}", world.resource::<WaveSchedule>().wave);
    println!("  Hostiles still on the field: {}", field.live_hostile_count());
    println!("  Gold: {}, experience: {}", treasury.gold, treasury.experience);
}
