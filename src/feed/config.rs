pub struct Config {
    pub stations_file_name: String,
    pub routes_file_name: String,
    pub trains_file_name: String,
    pub steps_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations_file_name: "stations.txt".into(),
            routes_file_name: "routes.txt".into(),
            trains_file_name: "trains.txt".into(),
            steps_file_name: "steps.txt".into(),
        }
    }
}
