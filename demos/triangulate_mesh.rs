//! Triangulating a mixed quad/triangle mesh against its vertex positions.

use ply_stream::Reader;
use std::io::Cursor;

fn main() {
    let ply_data = b"ply\n\
format ascii 1.0\n\
element vertex 5\n\
property float x\n\
property float y\n\
property float z\n\
element face 2\n\
property list uchar int vertex_indices\n\
end_header\n\
0 0 0\n\
1 0 0\n\
1 1 0\n\
0 1 0\n\
0.5 1.5 0\n\
4 0 1 2 3\n\
3 2 4 3\n";

    let mut reader = Reader::from_reader(Cursor::new(ply_data.to_vec()));
    assert!(reader.valid());

    reader.load_element().unwrap();
    let vertex_count = reader.element().unwrap().count;
    let vertex_data = reader.element_data().unwrap().to_vec();
    let mut positions = vec![0.0f32; vertex_count * 3];
    reader
        .element()
        .unwrap()
        .extract_scalar_tuple(&[b"x", b"y", b"z"], &vertex_data, &mut positions);
    reader.next_element().unwrap();

    reader.load_element().unwrap();
    let faces = reader.element().unwrap();
    assert_eq!(faces.count_triangles(0), Some(2));

    let mut triangle_indices = Vec::new();
    let triangles = faces
        .extract_triangles(0, &positions, vertex_count as u32, &mut triangle_indices)
        .unwrap();

    assert_eq!(triangles, 2);
    println!("{triangles} triangles: {triangle_indices:?}");
}
