//! View-state layer
//!
//! Holds the transient state of each page (filters, pagination cursor, form
//! fields, loading and error flags), calls the API layers, and reconciles
//! their results. Rendering itself is left to the caller; `display` offers
//! the text forms used by the CLI.
//!
//! No view ever propagates an error: failures end up in an `error` field.
//! Every submit resets its `submitting` flag whatever the outcome.

pub mod detail;
pub mod display;
pub mod forms;
pub mod movies;

pub use detail::{MovieDetailView, RatingForm};
pub use forms::{AddMovieForm, LoginForm, RegisterForm};
pub use movies::{LoadTicket, MovieListView};
