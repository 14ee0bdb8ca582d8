use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use futures::channel::oneshot;
use placecap_core::{
    entities::*,
    gateways::navigation::MapNavigator,
    usecases::{self, LocationPicker, LocationServices, NewPlace, PermissionGate},
};
use placecap_gateways::json_store::JsonPlaceStore;
use tokio::{runtime, task::LocalSet};

use crate::{
    config::Config,
    gateways,
    host::{
        ConsoleAlerts, ConsolePermissions, FileCamera, LocalSetSpawner, ScriptedMapScreen,
        SimulatedPositioning,
    },
};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick the (simulated) device position and resolve its address
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Pick a position on the (simulated) map and resolve its address
    Pick {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Capture a new place
    Add {
        #[arg(long)]
        title: String,
        /// Image file taken by the camera
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Pick the position on the map instead of the device position
        #[arg(long)]
        from_map: bool,
    },
    /// Show the details of a place
    Show {
        id: String,
        /// Show the place on the map
        #[arg(long)]
        on_map: bool,
    },
    /// List all places
    List,
    /// Print the map preview URL of a position
    Preview {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let cfg = Config::try_load_from_file_or_default(args.config_file.as_ref())?;
    let rt = runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();
    local.block_on(&rt, exec(cfg, args.command))
}

async fn exec(cfg: Config, command: Command) -> Result<()> {
    match command {
        Command::Locate { lat, lng } => {
            let pos = parse_map_point(lat, lng)?;
            let location = pick_location(&cfg, PickBy::Device(pos)).await?;
            print_location(&location);
        }
        Command::Pick { lat, lng } => {
            let pos = parse_map_point(lat, lng)?;
            let location = pick_location(&cfg, PickBy::Map(pos)).await?;
            print_location(&location);
        }
        Command::Add {
            title,
            image,
            lat,
            lng,
            from_map,
        } => {
            let pos = parse_map_point(lat, lng)?;
            let image_uri = take_image(&cfg, image).await?;
            let pick_by = if from_map {
                PickBy::Map(pos)
            } else {
                PickBy::Device(pos)
            };
            let location = pick_location(&cfg, pick_by).await?;
            let repo = place_store(&cfg)?;
            let new_place = NewPlace {
                title,
                image_uri,
                location: Some(location),
            };
            let place = usecases::create_new_place(&repo, new_place)?;
            println!("{}", place.id);
        }
        Command::Show { id, on_map } => {
            let repo = place_store(&cfg)?;
            let place = usecases::load_place(&repo, &id)?;
            print_place(&place);
            if on_map {
                let screen = ScriptedMapScreen::new(None);
                usecases::show_on_map(&screen, &place);
            }
        }
        Command::List => {
            let repo = place_store(&cfg)?;
            for place in usecases::load_places(&repo)? {
                println!("{}\t{}\t{}", place.id, place.title, place.address);
            }
        }
        Command::Preview { lat, lng } => {
            let pos = parse_map_point(lat, lng)?;
            println!("{}", gateways::map_preview(&cfg.map_preview).preview_url(pos));
        }
    }
    Ok(())
}

fn parse_map_point(lat: f64, lng: f64) -> Result<MapPoint> {
    MapPoint::try_from_lat_lng_deg(lat, lng).ok_or_else(|| anyhow!("Invalid position {lat},{lng}"))
}

fn place_store(cfg: &Config) -> Result<JsonPlaceStore> {
    let store = JsonPlaceStore::try_new(&cfg.store.dir)?;
    log::debug!("Places are stored in {}", store.path().display());
    Ok(store)
}

enum PickBy {
    Device(MapPoint),
    Map(MapPoint),
}

async fn pick_location(cfg: &Config, pick_by: PickBy) -> Result<PickedLocation> {
    let (device_pos, tapped) = match pick_by {
        PickBy::Device(pos) => (Some(pos), None),
        PickBy::Map(pos) => (None, Some(pos)),
    };
    let map_screen = Rc::new(ScriptedMapScreen::new(tapped));
    let services = LocationServices {
        permissions: Rc::new(ConsolePermissions::new(
            Capability::Location,
            cfg.permissions.location,
        )),
        alerts: Rc::new(ConsoleAlerts),
        positioning: Rc::new(SimulatedPositioning::new(device_pos)),
        geocoding: gateways::reverse_geocoding_gateway(&cfg.geocoding),
        navigator: Rc::clone(&map_screen) as Rc<dyn MapNavigator>,
        map_preview: gateways::map_preview(&cfg.map_preview),
        spawner: Rc::new(LocalSetSpawner),
    };
    let (tx, rx) = oneshot::channel();
    let tx = RefCell::new(Some(tx));
    let picker = LocationPicker::new(services, move |location| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(location);
        }
    });
    println!("{}", picker.preview());
    if device_pos.is_some() {
        picker.locate_user().await?;
    } else {
        picker.pick_on_map();
        let params = map_screen.take_return_params();
        if picker.on_screen_focus(true, params.as_ref()).is_none() {
            bail!("No position picked on the map");
        }
    }
    let location = rx.await?;
    println!("{}", picker.preview());
    Ok(location)
}

async fn take_image(cfg: &Config, image: Option<PathBuf>) -> Result<Option<String>> {
    let gate = PermissionGate::new(
        Capability::Camera,
        Rc::new(ConsolePermissions::new(
            Capability::Camera,
            cfg.permissions.camera,
        )),
        Rc::new(ConsoleAlerts),
    );
    let picker = usecases::ImagePicker::new(gate, Rc::new(FileCamera::new(image)), |uri| {
        log::info!("Took image {uri}");
    });
    Ok(picker.take_image().await?)
}

fn print_location(location: &PickedLocation) {
    println!("{}", location.pos);
    println!(
        "{}",
        location.address.as_deref().unwrap_or("(address unknown)")
    );
}

fn print_place(place: &Place) {
    println!("{}", place.title);
    println!("{}", place.image_uri);
    println!("{}", place.address);
    println!("{}", place.location);
}
