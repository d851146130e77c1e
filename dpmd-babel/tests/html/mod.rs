mod ingest;
mod render;
