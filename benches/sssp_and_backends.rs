use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graphalgo::graph::{ArrayGraph, IndexGraph, LinkedGraph, MutableGraph, Weights};
use graphalgo::heap::{BinaryHeap, FibonacciHeap, PairingHeap, RbHeap};
use graphalgo::shortest_path::Dijkstra;
use noisy_float::prelude::*;
use rand::Rng;
use static_init::dynamic;

#[dynamic]
static VERTEX_SIZE: usize = std::env::var("VERTEX_SIZE")
    .unwrap_or("10000".to_string())
    .parse()
    .unwrap();
#[dynamic]
static EDGE_SIZE: usize = std::env::var("EDGE_SIZE")
    .unwrap_or("100000".to_string())
    .parse()
    .unwrap();

criterion_group!(benches, backends, dijkstra_heaps);
criterion_main!(benches);

fn random_graph<G: MutableGraph>(mut g: G, n: usize, m: usize) -> (G, Weights<f64>) {
    let mut rng = rand::thread_rng();
    for _ in 0..n {
        g.add_vertex().unwrap();
    }
    g.add_edges_weights::<f64>("w", 0.0).unwrap();
    for _ in 0..m {
        let u = rng.gen::<usize>() % n;
        let v = rng.gen::<usize>() % n;
        let e = g.add_edge(u, v).unwrap();
        g.edges_weights_mut()
            .get_mut::<f64>("w")
            .unwrap()
            .set(e, rng.gen::<f64>() * 100.0);
    }
    let w = g.edges_weights().get::<f64>("w").unwrap().clone();
    (g, w)
}

fn backends(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let n = *VERTEX_SIZE;
    let m = *EDGE_SIZE;
    println!("VERTEX_SIZE: {}", n);
    println!("EDGE_SIZE: {}", m);
    c.bench_function("array_backed/build_and_tear", |b| {
        b.iter(|| {
            let (mut g, _) = random_graph(ArrayGraph::new_directed(), n, m);
            while g.edge_count() > 0 {
                g.remove_edge(g.edge_count() - 1).unwrap();
            }
            black_box(g.vertex_count())
        })
    });
    c.bench_function("linked/build_and_tear", |b| {
        b.iter(|| {
            let (mut g, _) = random_graph(LinkedGraph::new_directed(), n, m);
            while g.edge_count() > 0 {
                g.remove_edge(g.edge_count() - 1).unwrap();
            }
            black_box(g.vertex_count())
        })
    });
}

fn dijkstra_heaps(c: &mut Criterion) {
    let n = *VERTEX_SIZE;
    let m = *EDGE_SIZE;
    let (g, w) = random_graph(ArrayGraph::new_directed(), n, m);
    c.bench_function("dijkstra/pairing", |b| {
        b.iter(|| {
            let sp = Dijkstra::<PairingHeap<N64, usize>>::with_heap()
                .compute(&g, &w, 0)
                .unwrap();
            black_box(sp.distance(n - 1))
        })
    });
    c.bench_function("dijkstra/fibonacci", |b| {
        b.iter(|| {
            let sp = Dijkstra::<FibonacciHeap<N64, usize>>::with_heap()
                .compute(&g, &w, 0)
                .unwrap();
            black_box(sp.distance(n - 1))
        })
    });
    c.bench_function("dijkstra/binary", |b| {
        b.iter(|| {
            let sp = Dijkstra::<BinaryHeap<N64, usize>>::with_heap()
                .compute(&g, &w, 0)
                .unwrap();
            black_box(sp.distance(n - 1))
        })
    });
    c.bench_function("dijkstra/red_black", |b| {
        b.iter(|| {
            let sp = Dijkstra::<RbHeap<N64, usize>>::with_heap()
                .compute(&g, &w, 0)
                .unwrap();
            black_box(sp.distance(n - 1))
        })
    });
}
