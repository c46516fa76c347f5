use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{error, get, web, App, HttpResponse, HttpServer, Responder};

use clap::Parser;
use log::info;
use serde::Serialize;
use pw_gen_core::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_LENGTH, DEFAULT_ORDER, DEFAULT_PAD_ROUNDS};
use pw_gen_core::{Error, GeneratorConfig, PasswordGenerator, PasswordRestrictions, SequenceModel};

/// Command-line arguments for the password service
#[derive(Parser, Debug)]
#[command(name = "pw-gen-server")]
#[command(about = "Constraint-based password generator service")]
#[command(version)]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1", env = "PW_GEN_HOST")]
	host: String,

	/// Port to listen on
	#[arg(short, long, default_value_t = 8080, env = "PW_GEN_PORT")]
	port: u16,

	/// Trained model (`.json`, or `.bin` for the binary format)
	#[arg(short, long, default_value = "./model.json", env = "PW_GEN_MODEL")]
	model: PathBuf,

	/// Line-delimited training dataset
	#[arg(short, long, default_value = "./passwords.txt", env = "PW_GEN_DATASET")]
	dataset: PathBuf,

	/// Train a model from the dataset and save it before serving
	#[arg(long)]
	train: bool,

	/// Length cap for requests without maxLength
	#[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
	default_max_length: usize,

	/// Attempts per request before giving up
	#[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
	max_attempts: usize,

	/// Chunks appended at most while padding to minLength
	#[arg(long, default_value_t = DEFAULT_PAD_ROUNDS)]
	pad_rounds: usize,

	/// Markov order used by --train
	#[arg(long, default_value_t = DEFAULT_ORDER)]
	order: usize,
}

impl Args {
	fn generator_config(&self) -> GeneratorConfig {
		GeneratorConfig {
			default_max_length: self.default_max_length,
			max_attempts: self.max_attempts,
			pad_rounds: self.pad_rounds,
			order: self.order,
		}
	}
}

/// Body of every `/password-gen` response; exactly one field is non-empty.
#[derive(Serialize)]
struct PasswordResponse {
	error: String,
	password: String,
}

impl PasswordResponse {
	fn failure(error: impl ToString) -> Self {
		Self { error: error.to_string(), password: String::new() }
	}
}

/// Body of the `/model` endpoint.
#[derive(Serialize)]
struct ModelSummary {
	order: usize,
	contexts: usize,
	mean: f64,
	std_dev: f64,
}

/// Maps a generation failure to the status returned to the client.
fn status_for(err: &Error) -> StatusCode {
	match err {
		Error::Validation(_) => StatusCode::BAD_REQUEST,
		Error::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
		_ => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

/// HTTP GET endpoint `/password-gen`
///
/// Generates a password for the restrictions given as query parameters
/// (`minLength`, `maxLength`, `minDigits`, `minSpecialChars`, `minLetters`,
/// `userReadable`, `allUpperCase`, `allLowerCase`, `prefix`).
#[get("/password-gen")]
async fn get_password(generator: web::Data<PasswordGenerator>, query: web::Query<PasswordRestrictions>) -> impl Responder {
	match generator.generate(&query) {
		Ok(password) => HttpResponse::Ok().json(PasswordResponse { error: String::new(), password }),
		Err(e) => HttpResponse::build(status_for(&e)).json(PasswordResponse::failure(e)),
	}
}

/// HTTP GET endpoint `/model`
///
/// Summarizes the loaded sequence model.
#[get("/model")]
async fn get_model(generator: web::Data<PasswordGenerator>) -> impl Responder {
	match generator.model() {
		Some(model) => HttpResponse::Ok().json(ModelSummary {
			order: model.order(),
			contexts: model.chain().len(),
			mean: model.mean(),
			std_dev: model.std_dev(),
		}),
		None => HttpResponse::ServiceUnavailable().json(PasswordResponse::failure("no sequence model loaded")),
	}
}

/// Registers the endpoints and the JSON rejection of undecodable queries.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
		let response = HttpResponse::BadRequest().json(PasswordResponse::failure(&err));
		error::InternalError::from_response(err, response).into()
	}))
	.service(get_password)
	.service(get_model);
}

/// Trains a model when asked to, otherwise loads the saved one.
///
/// A missing or corrupt model only disables human-readable passwords.
fn build_generator(args: &Args) -> io::Result<PasswordGenerator> {
	let config = args.generator_config();
	if args.train {
		info!("training order-{} model from {}", config.order, args.dataset.display());
		let model = SequenceModel::train_from_file(&args.dataset, config.order).map_err(io::Error::other)?;
		model.save(&args.model).map_err(io::Error::other)?;
		info!("model saved to {}", args.model.display());
		return Ok(PasswordGenerator::new(config, Arc::new(model)));
	}
	Ok(PasswordGenerator::from_model_file(config, &args.model))
}

/// Main entry point for the server.
///
/// Builds the generator once; it is shared read-only by every worker,
/// so no lock is needed.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	let generator = web::Data::new(build_generator(&args)?);

	info!("password generator listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(generator.clone())
			.configure(configure)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
