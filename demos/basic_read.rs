//! Walking a multi-element PLY file and pulling out typed columns.

use ply_stream::Reader;
use std::io::Cursor;

fn main() {
    let ply_data = b"ply\n\
format ascii 1.0\n\
comment Colored triangle mesh\n\
element vertex 3\n\
property float x\n\
property float y\n\
property float z\n\
property uchar red\n\
property uchar green\n\
property uchar blue\n\
element face 1\n\
property list uchar uint vertex_indices\n\
end_header\n\
0.0 0.0 0.0 255 0 0\n\
1.0 0.0 0.0 0 255 0\n\
0.5 1.0 0.0 0 0 255\n\
3 0 1 2\n";

    let mut reader = Reader::from_reader(Cursor::new(ply_data.to_vec()));
    assert!(reader.valid());

    let mut positions = Vec::new();
    let mut triangle_count = 0u64;

    while reader.has_element() {
        let name = reader.element().unwrap().name.clone();
        if name == b"vertex" {
            reader.load_element().unwrap();
            let data = reader.element_data().unwrap().to_vec();
            let elem = reader.element().unwrap();
            positions = vec![0.0f32; elem.count * 3];
            elem.extract_scalar_tuple(&[b"x", b"y", b"z"], &data, &mut positions);
        } else if name == b"face" {
            reader.load_element().unwrap();
            let elem = reader.element().unwrap();
            triangle_count = elem.count_triangles(0).unwrap();
        }
        reader.next_element().unwrap();
    }

    assert_eq!(positions, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0]);
    assert_eq!(triangle_count, 1);
    println!("read {} vertices, {} triangles", positions.len() / 3, triangle_count);
}
