mod loading;
mod options;
mod schema;
