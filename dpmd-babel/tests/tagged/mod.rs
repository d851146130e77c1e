mod export;
mod heuristic;
mod import;
mod validation;
