use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::booking::{
	cancel_booking,
	check_in_booking,
	check_out_booking,
	confirm_booking,
	create_booking,
	get_booking,
	get_bookings_for_garage,
	get_garage_availability,
	get_own_bookings,
	quote_booking,
	reschedule_booking,
};
use crate::controllers::garage::{
	create_garage,
	delete_garage,
	get_garage,
	get_garages,
	update_garage,
};
use crate::controllers::healthcheck;
use crate::controllers::profile::get_current_profile;
use crate::controllers::schedule::{
	create_schedule_entries,
	delete_schedule_entry,
	get_schedule,
};
use crate::controllers::vehicle::{
	create_vehicle,
	delete_vehicle,
	get_own_vehicles,
	update_vehicle,
};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/profile", profile_routes())
		.nest("/garages", garage_routes())
		.nest("/vehicles", vehicle_routes())
		.nest("/bookings", booking_routes());

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

/// Profile routes
fn profile_routes() -> Router<AppState> {
	Router::new().route("/me", get(get_current_profile))
}

/// Garage routes, including the per-garage schedule, availability, quote
/// and booking-creation endpoints
fn garage_routes() -> Router<AppState> {
	Router::new()
		.route("/", post(create_garage).get(get_garages))
		.route(
			"/{id}",
			get(get_garage).patch(update_garage).delete(delete_garage),
		)
		.route(
			"/{id}/schedule",
			get(get_schedule).post(create_schedule_entries),
		)
		.route("/{id}/schedule/{entry_id}", delete(delete_schedule_entry))
		.route("/{id}/availability", get(get_garage_availability))
		.route("/{id}/quote", post(quote_booking))
		.route(
			"/{id}/bookings",
			post(create_booking).get(get_bookings_for_garage),
		)
}

/// Vehicle routes
fn vehicle_routes() -> Router<AppState> {
	Router::new()
		.route("/", post(create_vehicle).get(get_own_vehicles))
		.route("/{id}", patch(update_vehicle).delete(delete_vehicle))
}

/// Booking lifecycle routes
fn booking_routes() -> Router<AppState> {
	Router::new()
		.route("/", get(get_own_bookings))
		.route("/{id}", get(get_booking).patch(reschedule_booking))
		.route("/{id}/confirm", post(confirm_booking))
		.route("/{id}/cancel", post(cancel_booking))
		.route("/{id}/check-in", post(check_in_booking))
		.route("/{id}/check-out", post(check_out_booking))
}
