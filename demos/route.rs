use ketama_cluster::{ClusterModel, ClusterSpec, KetamaClusterModel};

fn main() {
    env_logger::init();

    let spec = ClusterSpec::from_dsns(&[
        "tcp://10.0.0.1:6379",
        "tcp://10.0.0.2:6379",
        "tcp://10.0.0.3:6379",
        "unix:///var/run/redis.sock",
    ])
    .expect("failed to parse cluster spec");

    let model = KetamaClusterModel::new(&spec).expect("failed to build cluster model");
    println!(
        "{} nodes, {} ring points",
        model.nodes().len(),
        model.ring().len()
    );

    let algorithm = spec.hash_algorithm();
    for key in &["foo", "bar", "user:1000", "session:42"] {
        println!(
            "{} ({} hash {}) -> {}",
            key,
            algorithm,
            algorithm.hash(key),
            model.node_for_key(key)
        );
    }

    let keys = vec!["a", "b", "c", "d", "e", "f"];
    for (node, keys) in model.nodes().iter().zip(model.partition_keys(keys)) {
        println!("{}: {:?}", node, keys);
    }
}
