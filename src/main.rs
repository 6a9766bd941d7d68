use anyhow::Context;
use clap::Parser;
use hotel_booking::utils::error::ErrorSeverity;
use hotel_booking::utils::validation::{parse_id, Validate};
use hotel_booking::utils::logger;
use hotel_booking::{
    validate_date, CliConfig, Command, CsvStore, HotelConfig, HotelError, HotelStore,
    ReservationManager,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => HotelConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => HotelConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(&config.logging.level);
    } else {
        logger::init_cli_logger(cli.verbose, &config.logging.level);
    }

    tracing::info!("Starting {} reservations", config.hotel.name);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let store = CsvStore::from_config(&config);
    tracing::debug!("📁 Data directory: {}", store.base_path().display());

    let result = ReservationManager::new(store).and_then(|mut manager| run(&mut manager, cli.command));

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run<S: HotelStore>(
    manager: &mut ReservationManager<S>,
    command: Command,
) -> Result<(), HotelError> {
    match command {
        Command::Rooms => {
            for room in manager.rooms() {
                println!("Room {:>3}  {}/night", room.room_id, room.cost());
            }
        }
        Command::Available {
            check_in,
            check_out,
        } => {
            let rooms =
                manager.find_available_rooms(validate_date(&check_in)?, validate_date(&check_out)?)?;
            if rooms.is_empty() {
                println!("No rooms available");
            }
            for room in rooms {
                println!("Room {:>3}  {}/night", room.room_id, room.cost());
            }
        }
        Command::Reserve {
            room,
            check_in,
            check_out,
        } => {
            let reservation = manager.reserve(
                parse_id(&room)?,
                validate_date(&check_in)?,
                validate_date(&check_out)?,
            )?;
            println!(
                "✅ Reservation {}: room {} for {} ({})",
                reservation.reservation_id(),
                reservation.room_id(),
                reservation.stay(),
                reservation.total_cost()?
            );
        }
        Command::List { date } => {
            let reservations = manager.list_reservations(validate_date(&date)?);
            if reservations.is_empty() {
                println!("No reservations on {}", date);
            }
            for reservation in reservations {
                let source = match reservation.block_id() {
                    Some(block_id) => format!(" [block {}]", block_id),
                    None => String::new(),
                };
                println!(
                    "#{:<4} room {:>3}  {}{}",
                    reservation.reservation_id(),
                    reservation.room_id(),
                    reservation.stay(),
                    source
                );
            }
        }
        Command::Cost { reservation } => {
            let id = parse_id(&reservation)?;
            println!("Reservation {} costs {}", id, manager.total_cost(id)?);
        }
        Command::CreateBlock {
            rooms,
            check_in,
            check_out,
            discount,
        } => {
            let room_ids = rooms
                .iter()
                .map(|room| parse_id(room))
                .collect::<Result<Vec<u32>, HotelError>>()?;
            let block = manager.create_block(
                &room_ids,
                validate_date(&check_in)?,
                validate_date(&check_out)?,
                discount,
            )?;
            println!(
                "✅ Block {}: rooms {:?} for {} at {} off",
                block.block_id(),
                block.room_ids().collect::<Vec<_>>(),
                block.stay(),
                block.discount_rate()
            );
        }
        Command::BlockRooms { block } => {
            let rooms = manager.check_available_rooms_in_blocks(parse_id(&block)?)?;
            if rooms.is_empty() {
                println!("Every room in block {} is taken", block);
            }
            for room in rooms {
                println!("Room {:>3}  {:?}", room.room_id, room.status);
            }
        }
        Command::ReserveBlock { room, block } => {
            let reservation = manager.reserve_from_block(parse_id(&room)?, parse_id(&block)?)?;
            println!(
                "✅ Reservation {}: room {} from block {} for {} ({})",
                reservation.reservation_id(),
                reservation.room_id(),
                block,
                reservation.stay(),
                reservation.total_cost()?
            );
        }
        Command::SetRate { room, rate } => {
            let room = manager.set_room_rate(parse_id(&room)?, rate)?;
            println!("✅ Room {} now costs {}/night", room.room_id, room.cost());
        }
    }
    Ok(())
}
