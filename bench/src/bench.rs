use column_mesh::ilattice::glam::UVec2;
use column_mesh::ilattice::prelude::Extent;
use column_mesh::{
    mesh_chunk, ChunkKey, HeightEdit, HeightSamples, HeightSource, MeshBuffer, MeshParams,
    TerrainConfig, TerrainMesh, VoxelGrid, RIGHT_HANDED_Y_UP_CONFIG,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const SIZE: u32 = 256;
const CHUNK: u32 = 16;

fn bench_init_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_init_flat");
    let config = TerrainConfig::new(SIZE, SIZE, CHUNK, CHUNK);
    let source = HeightSource::Flat(0);

    let terrain = TerrainMesh::new(config.clone(), &source).unwrap();
    group.bench_with_input(
        BenchmarkId::from_parameter(format!("quads={}", total_quads(&terrain))),
        &(),
        |b, _| b.iter(|| TerrainMesh::new(config.clone(), &source).unwrap()),
    );
    group.finish();
}

fn bench_init_hills(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_init_hills");
    let config = TerrainConfig::new(SIZE, SIZE, CHUNK, CHUNK);
    let source = HeightSource::Samples(hills());

    let terrain = TerrainMesh::new(config.clone(), &source).unwrap();
    group.bench_with_input(
        BenchmarkId::from_parameter(format!("quads={}", total_quads(&terrain))),
        &(),
        |b, _| b.iter(|| TerrainMesh::new(config.clone(), &source).unwrap()),
    );
    group.finish();
}

fn bench_single_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_single_edit");
    let config = TerrainConfig::new(SIZE, SIZE, CHUNK, CHUNK);
    let mut terrain = TerrainMesh::new(config, &HeightSource::Samples(hills())).unwrap();

    // Toggle a column on a chunk corner so that three chunks are remeshed every iteration.
    let (x, z) = (CHUNK - 1, CHUNK - 1);
    let original = terrain.height(x, z).unwrap();
    let mut raised = false;
    group.bench_with_input(BenchmarkId::from_parameter("corner"), &(), |b, _| {
        b.iter(|| {
            raised = !raised;
            let height = if raised { original + 5 } else { original };
            terrain
                .apply_height_edits([HeightEdit::new(x, z, height)])
                .unwrap()
        });
    });
    group.finish();
}

fn bench_mesh_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_mesh_chunk");
    let grid = VoxelGrid::from_source(SIZE, SIZE, &HeightSource::Samples(hills()), 20.0).unwrap();
    let config = TerrainConfig::new(SIZE, SIZE, CHUNK, CHUNK);
    let params = MeshParams::new(&RIGHT_HANDED_Y_UP_CONFIG, &config.atlas, config.floor_y);
    let extent = Extent::from_min_and_shape(UVec2::splat(CHUNK), UVec2::splat(CHUNK));

    // Do a single run first to allocate the buffers to the right size.
    let mut buffer = MeshBuffer::new();
    let mut face_flags = Vec::new();
    let key = ChunkKey::new(1, 1);
    mesh_chunk(&grid, key, &extent, &params, &mut buffer, &mut face_flags).unwrap();

    group.bench_with_input(
        BenchmarkId::from_parameter(format!("quads={}", buffer.num_quads())),
        &(),
        |b, _| {
            b.iter(|| {
                mesh_chunk(&grid, key, &extent, &params, &mut buffer, &mut face_flags).unwrap()
            });
        },
    );
    group.finish();
}

criterion_group!(
    benches,
    bench_init_flat,
    bench_init_hills,
    bench_single_edit,
    bench_mesh_chunk
);
criterion_main!(benches);

fn total_quads(terrain: &TerrainMesh) -> usize {
    terrain.chunks().map(|c| c.mesh().num_quads()).sum()
}

fn hills() -> HeightSamples {
    HeightSamples::from_fn(SIZE, SIZE, |x, z| {
        let [x, z] = into_domain(SIZE, [x, z]);
        0.5 + 0.25 * (x * 6.0).sin() * (z * 4.0).cos()
    })
    .unwrap()
}

fn into_domain(array_dim: u32, [x, z]: [u32; 2]) -> [f32; 2] {
    [
        (2.0 * x as f32 / array_dim as f32) - 1.0,
        (2.0 * z as f32 / array_dim as f32) - 1.0,
    ]
}
