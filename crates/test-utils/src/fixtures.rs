//! Capability-document fixtures.
//!
//! Hand-trimmed versions of real GetCapabilities / TileMapResource
//! responses. The WMS 1.3.0 fixture carries namespace prefixes on
//! purpose; parsers must not care about them.

/// WMS 1.3.0 capabilities with nested layers exercising CRS, style and
/// bounding-box inheritance. Prefixed with a vendor namespace.
pub const WMS_CAPABILITIES_1_3_0: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wms:WMS_Capabilities version="1.3.0" xmlns:wms="http://www.opengis.net/wms">
  <wms:Service>
    <wms:Name>WMS</wms:Name>
    <wms:Title>Acme Imagery</wms:Title>
    <wms:Fees>none</wms:Fees>
    <wms:AccessConstraints>none</wms:AccessConstraints>
  </wms:Service>
  <wms:Capability>
    <wms:Request>
      <wms:GetMap>
        <wms:Format>image/gif</wms:Format>
        <wms:Format>image/png</wms:Format>
        <wms:Format>image/jpeg</wms:Format>
      </wms:GetMap>
    </wms:Request>
    <wms:Layer>
      <wms:Title>Acme Map Server</wms:Title>
      <wms:CRS>CRS:84</wms:CRS>
      <wms:EX_GeographicBoundingBox>
        <wms:westBoundLongitude>-180</wms:westBoundLongitude>
        <wms:eastBoundLongitude>180</wms:eastBoundLongitude>
        <wms:southBoundLatitude>-90</wms:southBoundLatitude>
        <wms:northBoundLatitude>90</wms:northBoundLatitude>
      </wms:EX_GeographicBoundingBox>
      <wms:Layer>
        <wms:Name>ROADS_RIVERS</wms:Name>
        <wms:Title>Roads and Rivers</wms:Title>
        <wms:CRS>EPSG:26986</wms:CRS>
        <wms:EX_GeographicBoundingBox>
          <wms:westBoundLongitude>-71.63</wms:westBoundLongitude>
          <wms:eastBoundLongitude>-70.78</wms:eastBoundLongitude>
          <wms:southBoundLatitude>41.75</wms:southBoundLatitude>
          <wms:northBoundLatitude>42.90</wms:northBoundLatitude>
        </wms:EX_GeographicBoundingBox>
        <wms:Style>
          <wms:Name>USGS</wms:Name>
          <wms:Title>USGS Topo Map Style</wms:Title>
        </wms:Style>
        <wms:Layer>
          <wms:Name>ROADS_1M</wms:Name>
          <wms:Title>Roads at 1:1M scale</wms:Title>
          <wms:Abstract>Roads at a scale of 1 to 1 million.</wms:Abstract>
          <wms:Style>
            <wms:Name>ATLAS</wms:Name>
            <wms:Title>Road atlas style</wms:Title>
          </wms:Style>
        </wms:Layer>
        <wms:Layer>
          <wms:Name>RIVERS_1M</wms:Name>
          <wms:Title>Rivers at 1:1M scale</wms:Title>
        </wms:Layer>
      </wms:Layer>
      <wms:Layer>
        <wms:Name>Clouds</wms:Name>
        <wms:Title>Forecast cloud cover</wms:Title>
        <wms:Style>
          <wms:Title>Style with no name, must be ignored</wms:Title>
        </wms:Style>
      </wms:Layer>
    </wms:Layer>
  </wms:Capability>
</wms:WMS_Capabilities>
"#;

/// WMS 1.1.1 capabilities: SRS elements and LatLonBoundingBox instead of
/// the 1.3.0 equivalents.
pub const WMS_CAPABILITIES_1_1_1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMT_MS_Capabilities version="1.1.1">
  <Service>
    <Name>OGC:WMS</Name>
    <Title>Acme Imagery</Title>
  </Service>
  <Capability>
    <Request>
      <GetMap>
        <Format>image/png</Format>
        <Format>image/jpeg</Format>
      </GetMap>
    </Request>
    <Layer>
      <Title>Acme Map Server</Title>
      <SRS>EPSG:4326</SRS>
      <LatLonBoundingBox minx="-180" miny="-90" maxx="180" maxy="90"/>
      <Layer>
        <Name>ROADS_RIVERS</Name>
        <Title>Roads and Rivers</Title>
        <SRS>EPSG:26986</SRS>
        <LatLonBoundingBox minx="-71.63" miny="41.75" maxx="-70.78" maxy="42.90"/>
        <Style>
          <Name>USGS</Name>
          <Title>USGS Topo Map Style</Title>
        </Style>
      </Layer>
    </Layer>
  </Capability>
</WMT_MS_Capabilities>
"#;

/// WMS 1.0.0 capabilities: formats are the child tag names of
/// `<Map><Format>`.
pub const WMS_CAPABILITIES_1_0_0: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMT_MS_Capabilities version="1.0.0">
  <Service>
    <Name>GetCapabilities</Name>
    <Title>Acme Imagery</Title>
  </Service>
  <Capability>
    <Request>
      <Map>
        <Format>
          <GIF/>
          <JPEG/>
          <PNG/>
        </Format>
      </Map>
    </Request>
    <Layer>
      <Title>Acme Map Server</Title>
      <SRS>EPSG:4326</SRS>
      <LatLonBoundingBox minx="-180" miny="-90" maxx="180" maxy="90"/>
      <Layer>
        <Name>ROADS_1M</Name>
        <Title>Roads at 1:1M scale</Title>
        <Style>
          <Name>default</Name>
        </Style>
      </Layer>
    </Layer>
  </Capability>
</WMT_MS_Capabilities>
"#;

/// A WMS service exception instead of capabilities.
pub const WMS_EXCEPTION_1_3_0: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.3.0" xmlns="http://www.opengis.net/ogc">
  <ServiceException code="InvalidParameterValue">
    msWMSLoadGetMapParams(): WMS server error. Invalid layer(s) given in the LAYERS parameter.
  </ServiceException>
</ServiceExceptionReport>
"#;

/// WMTS capabilities with a Slippy-Map compatible tile matrix set and a
/// simpleProfileTile resource URL.
pub const WMTS_CAPABILITIES_OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Capabilities xmlns="http://www.opengis.net/wmts/1.0"
              xmlns:ows="http://www.opengis.net/ows/1.1" version="1.0.0">
  <Contents>
    <Layer>
      <ows:Title>OpenStreetMap</ows:Title>
      <ows:Identifier>OSM</ows:Identifier>
      <Style isDefault="true">
        <ows:Identifier>default</ows:Identifier>
      </Style>
      <Format>image/png</Format>
      <TileMatrixSetLink>
        <TileMatrixSet>GoogleMapsCompatible</TileMatrixSet>
      </TileMatrixSetLink>
      <ResourceURL format="image/png" resourceType="simpleProfileTile"
                   template="http://tile.openstreetmap.org/{TileMatrix}/{TileCol}/{TileRow}.png"/>
      <ResourceURL format="image/png" resourceType="tile"
                   template="http://tile.openstreetmap.org/{TileMatrix}/{TileCol}/{TileRow}.png"/>
    </Layer>
    <TileMatrixSet>
      <ows:Identifier>GoogleMapsCompatible</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:EPSG::3857</ows:SupportedCRS>
      <TileMatrix>
        <ows:Identifier>0</ows:Identifier>
        <ScaleDenominator>559082264.0287178</ScaleDenominator>
        <TopLeftCorner>-20037508.34278925 20037508.34278925</TopLeftCorner>
        <TileWidth>256</TileWidth>
        <TileHeight>256</TileHeight>
        <MatrixWidth>1</MatrixWidth>
        <MatrixHeight>1</MatrixHeight>
      </TileMatrix>
      <TileMatrix>
        <ows:Identifier>1</ows:Identifier>
        <ScaleDenominator>279541132.0143589</ScaleDenominator>
        <TopLeftCorner>-20037508.34278925 20037508.34278925</TopLeftCorner>
        <TileWidth>256</TileWidth>
        <TileHeight>256</TileHeight>
        <MatrixWidth>2</MatrixWidth>
        <MatrixHeight>2</MatrixHeight>
      </TileMatrix>
      <TileMatrix>
        <ows:Identifier>2</ows:Identifier>
        <ScaleDenominator>139770566.00717944</ScaleDenominator>
        <TopLeftCorner>-20037508.34278925 20037508.34278925</TopLeftCorner>
        <TileWidth>256</TileWidth>
        <TileHeight>256</TileHeight>
        <MatrixWidth>4</MatrixWidth>
        <MatrixHeight>4</MatrixHeight>
      </TileMatrix>
    </TileMatrixSet>
  </Contents>
</Capabilities>
"#;

/// WMTS capabilities whose only tile matrix set is geographic; nothing in
/// here qualifies for a TMS rewrite.
pub const WMTS_CAPABILITIES_GEOGRAPHIC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Capabilities xmlns="http://www.opengis.net/wmts/1.0"
              xmlns:ows="http://www.opengis.net/ows/1.1" version="1.0.0">
  <Contents>
    <Layer>
      <ows:Title>Coastlines</ows:Title>
      <ows:Identifier>coastlines</ows:Identifier>
      <Style isDefault="true">
        <ows:Identifier>default</ows:Identifier>
      </Style>
      <Format>image/png</Format>
      <Dimension>
        <ows:Identifier>Time</ows:Identifier>
        <Default>2024-01-01</Default>
        <Value>2024-01-01</Value>
        <Value>2024-06-01</Value>
      </Dimension>
      <TileMatrixSetLink>
        <TileMatrixSet>WorldCRS84Quad</TileMatrixSet>
      </TileMatrixSetLink>
    </Layer>
    <TileMatrixSet>
      <ows:Identifier>WorldCRS84Quad</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:OGC:1.3:CRS84</ows:SupportedCRS>
      <TileMatrix>
        <ows:Identifier>0</ows:Identifier>
        <ScaleDenominator>279541132.0143589</ScaleDenominator>
        <TopLeftCorner>-180 90</TopLeftCorner>
        <TileWidth>256</TileWidth>
        <TileHeight>256</TileHeight>
        <MatrixWidth>2</MatrixWidth>
        <MatrixHeight>1</MatrixHeight>
      </TileMatrix>
    </TileMatrixSet>
  </Contents>
</Capabilities>
"#;

/// TMS TileMapResource with four zoom levels in Web Mercator.
pub const TILEMAP_RESOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TileMap version="1.0.0" tilemapservice="http://tms.example.com/tms/1.0.0">
  <Title>Rennes 2014 Orthophoto</Title>
  <Abstract>Aerial imagery of Rennes.</Abstract>
  <SRS>EPSG:900913</SRS>
  <BoundingBox minx="-20037508.34278925" miny="-20037508.34278925"
               maxx="20037508.34278925" maxy="20037508.34278925"/>
  <Origin x="-20037508.34278925" y="-20037508.34278925"/>
  <TileFormat width="256" height="256" mime-type="image/png" extension="png"/>
  <TileSets profile="mercator">
    <TileSet href="http://tms.example.com/tms/1.0.0/rennes/0" units-per-pixel="156543.03392804097" order="0"/>
    <TileSet href="http://tms.example.com/tms/1.0.0/rennes/1" units-per-pixel="78271.51696402048" order="1"/>
    <TileSet href="http://tms.example.com/tms/1.0.0/rennes/2" units-per-pixel="39135.75848201024" order="2"/>
    <TileSet href="http://tms.example.com/tms/1.0.0/rennes/3" units-per-pixel="19567.87924100512" order="3"/>
  </TileSets>
</TileMap>
"#;
